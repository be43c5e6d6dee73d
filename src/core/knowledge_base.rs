//! # KnowledgeBase — Corpus Statique de Sensibilisation
//!
//! La [`KnowledgeBase`] est le document structuré chargé **une seule fois**
//! au démarrage depuis un fichier YAML, puis traité comme un corpus en
//! lecture seule. Elle contient trois sections de premier niveau :
//!
//! | Section | Contenu | Consommateur |
//! |---------|---------|--------------|
//! | `faq` | séquence ordonnée de [`FaqEntry`] | [`FaqRetriever`](crate::nlu::retriever::FaqRetriever) |
//! | `tips` | astuces génériques (chaînes) | tirage aléatoire par l'orchestrateur |
//! | `guidance` | intention → [`Guidance`] | enrichissement des réponses |
//!
//! ## Identité des entrées
//!
//! Une entrée de FAQ est identifiée par sa **position** dans la séquence
//! chargée — l'index sert de clé implicite pour les recherches par
//! similarité. L'ordre du fichier YAML est donc significatif.
//!
//! ## Échec au démarrage
//!
//! L'absence ou la malformation du fichier est une erreur **fatale**
//! ([`KbError`]) : le système ne démarre pas sans son corpus.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::nlu::intent::Intent;

/// Erreurs de chargement de la base de connaissances.
///
/// Toutes fatales : elles interrompent l'initialisation du service.
#[derive(Debug, thiserror::Error)]
pub enum KbError {
    /// Le fichier n'existe pas à l'emplacement attendu.
    #[error("base de connaissances introuvable: {}", .0.display())]
    Missing(PathBuf),

    /// Lecture du fichier impossible (permissions, I/O).
    #[error("lecture de {} impossible", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Le YAML ne correspond pas au schéma attendu.
    #[error("YAML invalide dans {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Une entrée de FAQ : question, réponse et catégorie.
///
/// Immuable après chargement. La catégorie participe au corpus de
/// similarité (elle améliore le rappel sur les requêtes thématiques).
#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    /// La question telle que posée dans la FAQ.
    pub question: String,
    /// La réponse rédigée.
    pub answer: String,
    /// Catégorie thématique (ex: "phishing", "mots de passe").
    #[serde(default)]
    pub category: String,
}

/// Bloc de guidance associé à une intention.
///
/// Sert à enrichir le message de réponse : un paragraphe de contexte,
/// puis des listes à puces. Les listes vides sont simplement omises
/// du rendu (voir l'orchestrateur).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Guidance {
    /// Pourquoi le sujet compte — rendu comme paragraphe "Contexte".
    #[serde(default)]
    pub why: String,
    /// Bonnes pratiques, dans l'ordre du fichier.
    #[serde(default)]
    pub best_practices: Vec<String>,
    /// Erreurs courantes, dans l'ordre du fichier.
    #[serde(default)]
    pub common_mistakes: Vec<String>,
}

/// Corpus statique complet : FAQ + astuces + guidance par intention.
#[derive(Debug, Default, Deserialize)]
pub struct KnowledgeBase {
    /// Entrées de FAQ, ordonnées — l'index est la clé implicite.
    #[serde(default)]
    pub faq: Vec<FaqEntry>,
    /// Astuces tirées au hasard à chaque réponse.
    #[serde(default)]
    pub tips: Vec<String>,
    /// Guidance indexée par nom d'intention (ex: "phishing_incident").
    #[serde(default)]
    pub guidance: HashMap<String, Guidance>,
}

impl KnowledgeBase {
    /// Charge la base de connaissances depuis un fichier YAML.
    ///
    /// # Erreurs
    ///
    /// [`KbError::Missing`] si le fichier n'existe pas, [`KbError::Io`] si
    /// la lecture échoue, [`KbError::Parse`] si le YAML est malformé.
    pub fn load(path: &Path) -> Result<Self, KbError> {
        if !path.exists() {
            return Err(KbError::Missing(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| KbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb: KnowledgeBase = serde_yaml::from_str(&raw).map_err(|source| KbError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            faq = kb.faq.len(),
            tips = kb.tips.len(),
            guidance = kb.guidance.len(),
            "base de connaissances chargée"
        );
        Ok(kb)
    }

    /// Construit le corpus de similarité : un document par entrée de FAQ.
    ///
    /// Chaque document concatène question, réponse et catégorie — matcher
    /// sur la question seule rate trop de reformulations.
    pub fn corpus(&self) -> Vec<String> {
        self.faq
            .iter()
            .map(|e| format!("{} {} {}", e.question, e.answer, e.category))
            .collect()
    }

    /// Retourne la guidance associée à une intention, si elle existe.
    ///
    /// Une intention absente de la section `guidance` ne contribue rien —
    /// l'enrichissement dégrade en silence.
    pub fn guidance_for(&self, intent: Intent) -> Option<&Guidance> {
        self.guidance.get(intent.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
faq:
  - question: "Comment créer un mot de passe solide ?"
    answer: "Utilisez au moins 12 caractères variés."
    category: "mots de passe"
  - question: "Comment détecter un email suspect ?"
    answer: "Vérifiez l'expéditeur et les liens."
    category: "phishing"
tips:
  - "Activez la MFA partout."
guidance:
  phishing_incident:
    why: "Le phishing est le vecteur d'attaque le plus courant."
    best_practices:
      - "Vérifiez l'expéditeur."
    common_mistakes:
      - "Cliquer avant de réfléchir."
"#;

    #[test]
    fn parse_sections() {
        let kb: KnowledgeBase = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(kb.faq.len(), 2);
        assert_eq!(kb.tips.len(), 1);
        assert!(kb.guidance.contains_key("phishing_incident"));
    }

    #[test]
    fn corpus_concatenates_question_answer_category() {
        let kb: KnowledgeBase = serde_yaml::from_str(SAMPLE).unwrap();
        let corpus = kb.corpus();
        assert_eq!(corpus.len(), 2);
        assert!(corpus[0].contains("mot de passe solide"));
        assert!(corpus[0].contains("12 caractères"));
        assert!(corpus[0].contains("mots de passe"));
    }

    #[test]
    fn guidance_lookup_by_intent() {
        let kb: KnowledgeBase = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(kb.guidance_for(Intent::PhishingIncident).is_some());
        assert!(kb.guidance_for(Intent::Vpn).is_none());
    }

    #[test]
    fn bundled_knowledge_base_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/knowledge_base.yaml");
        let kb = KnowledgeBase::load(&path).unwrap();
        assert!(!kb.faq.is_empty());
        assert!(!kb.tips.is_empty());
        assert!(kb.guidance_for(Intent::PhishingIncident).is_some());
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = KnowledgeBase::load(Path::new("/nonexistent/kb.yaml")).unwrap_err();
        assert!(matches!(err, KbError::Missing(_)));
    }

    #[test]
    fn malformed_yaml_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.yaml");
        std::fs::write(&path, "faq: {not: [a, list").unwrap();
        let err = KnowledgeBase::load(&path).unwrap_err();
        assert!(matches!(err, KbError::Parse { .. }));
    }
}
