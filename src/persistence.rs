//! # Persistance — Journal des Conversations, Incidents et Compteurs
//!
//! Le [`ConversationStore`] est le puits de persistance de CyberGuard :
//! un service append/query opaque du point de vue de l'orchestrateur.
//! Trois familles d'enregistrements, calquées sur le schéma d'origine :
//!
//! | Famille | Contenu | Requêtes |
//! |---------|---------|----------|
//! | conversations | un [`TurnRecord`] par tour | historique par utilisateur |
//! | incidents | [`IncidentRecord`] ouverts/fermés | incidents ouverts, clôture |
//! | metrics | [`MetricRecord`] à valeur 1 | agrégat par `nom_intention` |
//!
//! ## Support de stockage
//!
//! Fichier JSON « pretty-printed » sous `data/`, réécrit à chaque ajout.
//! L'écriture **n'est pas atomique** — acceptable ici ; une version
//! durcie passerait par write-rename.
//!
//! ## Sémantique d'échec
//!
//! Chaque écriture est bloquante et son échec remonte en [`StoreError`]
//! jusqu'à l'appelant de `respond` — jamais réessayé, jamais avalé.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Erreurs du puits de persistance.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Lecture ou écriture du fichier impossible.
    #[error("accès au fichier {} impossible", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Contenu du fichier illisible ou sérialisation impossible.
    #[error("contenu JSON invalide dans {}", path.display())]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Un tour de conversation journalisé.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Identifiant du tour.
    pub id: Uuid,
    /// Identifiant de l'utilisateur.
    pub user_id: String,
    /// Message de l'utilisateur tel que reçu.
    pub user_message: String,
    /// Message composé par l'agent.
    pub agent_response: String,
    /// Étiquette d'intention sous laquelle le tour est journalisé.
    pub intent: String,
    /// Horodatage UTC de l'enregistrement.
    pub timestamp: DateTime<Utc>,
}

/// Statut d'un incident de sécurité.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Incident ouvert, en attente de traitement.
    Open,
    /// Incident clôturé.
    Closed,
}

/// Un incident de sécurité enregistré (phishing, compromission, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Identifiant de l'incident.
    pub id: Uuid,
    /// Utilisateur à l'origine du signalement.
    pub user_id: String,
    /// Intention associée (ex: "phishing_incident").
    pub intent: String,
    /// Sévérité libre (ex: "high").
    pub severity: String,
    /// Détails du signalement.
    pub details: String,
    /// Statut courant.
    pub status: IncidentStatus,
    /// Horodatage UTC de l'enregistrement.
    pub timestamp: DateTime<Utc>,
}

/// Un incrément de compteur nommé, optionnellement étiqueté par intention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Nom du compteur (ex: "question_asked").
    pub name: String,
    /// Étiquette d'intention, vide si non étiquetée.
    pub intent: String,
    /// Horodatage UTC de l'incrément.
    pub timestamp: DateTime<Utc>,
}

/// Contenu sérialisé du fichier de persistance.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    conversations: Vec<TurnRecord>,
    #[serde(default)]
    incidents: Vec<IncidentRecord>,
    #[serde(default)]
    metrics: Vec<MetricRecord>,
}

/// Puits de persistance append/query, adossé à un fichier JSON.
///
/// Le verrou interne sérialise les écritures ; les lectures concurrentes
/// sont partagées. L'orchestrateur ne connaît que l'interface append +
/// query — le support de stockage est un détail de ce module.
pub struct ConversationStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl ConversationStore {
    /// Ouvre le fichier de persistance, ou démarre vide s'il n'existe pas.
    ///
    /// # Erreurs
    ///
    /// [`StoreError::Io`] si le fichier existe mais n'est pas lisible,
    /// [`StoreError::Serde`] s'il est corrompu.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| StoreError::Serde {
                path: path.clone(),
                source,
            })?
        } else {
            tracing::info!(path = %path.display(), "aucun journal existant, démarrage à vide");
            StoreData::default()
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Réécrit le fichier à partir de l'état courant.
    fn flush(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Serde {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Journalise un tour de conversation.
    pub fn save_conversation(
        &self,
        user_id: &str,
        user_message: &str,
        agent_response: &str,
        intent: &str,
    ) -> Result<(), StoreError> {
        let mut data = self.data.write();
        data.conversations.push(TurnRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            user_message: user_message.to_string(),
            agent_response: agent_response.to_string(),
            intent: intent.to_string(),
            timestamp: Utc::now(),
        });
        self.flush(&data)
    }

    /// Enregistre un incident de sécurité (statut initial: ouvert).
    pub fn save_incident(
        &self,
        user_id: &str,
        intent: &str,
        severity: &str,
        details: &str,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let mut data = self.data.write();
        data.incidents.push(IncidentRecord {
            id,
            user_id: user_id.to_string(),
            intent: intent.to_string(),
            severity: severity.to_string(),
            details: details.to_string(),
            status: IncidentStatus::Open,
            timestamp: Utc::now(),
        });
        self.flush(&data)?;
        Ok(id)
    }

    /// Incrémente un compteur nommé, optionnellement étiqueté par intention.
    pub fn increment_metric(&self, name: &str, intent: &str) -> Result<(), StoreError> {
        let mut data = self.data.write();
        data.metrics.push(MetricRecord {
            name: name.to_string(),
            intent: intent.to_string(),
            timestamp: Utc::now(),
        });
        self.flush(&data)
    }

    /// Historique d'un utilisateur, du plus récent au plus ancien,
    /// borné à `limit` tours.
    pub fn history(&self, user_id: &str, limit: usize) -> Vec<TurnRecord> {
        let data = self.data.read();
        data.conversations
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Compteurs agrégés : clé `nom_intention` (ou `nom` seul si le
    /// compteur n'est pas étiqueté) → nombre d'incréments.
    pub fn metrics_summary(&self) -> HashMap<String, u64> {
        let data = self.data.read();
        let mut summary = HashMap::new();
        for m in &data.metrics {
            let key = if m.intent.is_empty() {
                m.name.clone()
            } else {
                format!("{}_{}", m.name, m.intent)
            };
            *summary.entry(key).or_insert(0) += 1;
        }
        summary
    }

    /// Incidents encore ouverts, du plus récent au plus ancien.
    pub fn open_incidents(&self) -> Vec<IncidentRecord> {
        let data = self.data.read();
        let mut open: Vec<IncidentRecord> = data
            .incidents
            .iter()
            .filter(|i| i.status == IncidentStatus::Open)
            .cloned()
            .collect();
        open.reverse();
        open
    }

    /// Clôture un incident. Retourne `false` si l'identifiant est inconnu.
    pub fn close_incident(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut data = self.data.write();
        let Some(incident) = data.incidents.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        incident.status = IncidentStatus::Closed;
        self.flush(&data)?;
        Ok(true)
    }

    /// Chemin du fichier adossé — utile pour le log de démarrage.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (ConversationStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path().join("conversations.json")).unwrap();
        (store, dir)
    }

    #[test]
    fn history_is_per_user_most_recent_first() {
        let (s, _dir) = store();
        s.save_conversation("alice", "q1", "r1", "general").unwrap();
        s.save_conversation("bob", "q2", "r2", "mfa").unwrap();
        s.save_conversation("alice", "q3", "r3", "vpn").unwrap();

        let hist = s.history("alice", 10);
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[0].user_message, "q3");
        assert_eq!(hist[1].user_message, "q1");

        assert_eq!(s.history("alice", 1).len(), 1);
        assert!(s.history("carol", 10).is_empty());
    }

    #[test]
    fn metrics_aggregate_by_name_and_intent() {
        let (s, _dir) = store();
        s.increment_metric("question_asked", "greeting").unwrap();
        s.increment_metric("question_asked", "greeting").unwrap();
        s.increment_metric("question_asked", "mfa").unwrap();
        s.increment_metric("startup", "").unwrap();

        let summary = s.metrics_summary();
        assert_eq!(summary.get("question_asked_greeting"), Some(&2));
        assert_eq!(summary.get("question_asked_mfa"), Some(&1));
        assert_eq!(summary.get("startup"), Some(&1));
    }

    #[test]
    fn incidents_open_then_close() {
        let (s, _dir) = store();
        let id = s
            .save_incident("alice", "phishing_incident", "high", "lien cliqué")
            .unwrap();
        assert_eq!(s.open_incidents().len(), 1);

        assert!(s.close_incident(id).unwrap());
        assert!(s.open_incidents().is_empty());
        assert!(!s.close_incident(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn reopens_persisted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        {
            let s = ConversationStore::open(&path).unwrap();
            s.save_conversation("alice", "q", "r", "general").unwrap();
        }
        let s = ConversationStore::open(&path).unwrap();
        assert_eq!(s.history("alice", 10).len(), 1);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversations.json");
        std::fs::write(&path, "pas du json").unwrap();
        assert!(matches!(
            ConversationStore::open(&path),
            Err(StoreError::Serde { .. })
        ));
    }
}
