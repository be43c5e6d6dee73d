//! # AgentResponse — La Réponse Structurée d'un Tour
//!
//! Chaque appel à [`Orchestrator::respond`](crate::orchestrator::Orchestrator::respond)
//! construit une [`AgentResponse`] fraîche, immuable une fois retournée.
//! La couche transport la sérialise telle quelle.
//!
//! Les sections absentes dégradent proprement : pas d'étapes → liste vide,
//! pas de question de suivi → chaîne vide. Jamais d'erreur pour une
//! section manquante.

use serde::{Deserialize, Serialize};

use crate::nlu::intent::Intent;

/// Une suggestion cliquable : libellé (question de FAQ) et score de
/// similarité avec le message de l'utilisateur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Libellé affiché (la question de la FAQ, ou un prompt fixe).
    pub label: String,
    /// Score de similarité cosinus, 1.0 pour les suggestions fixes.
    pub score: f32,
}

impl Suggestion {
    /// Suggestion fixe à haute affinité (score 1.0).
    pub fn pinned(label: &str) -> Self {
        Self {
            label: label.to_string(),
            score: 1.0,
        }
    }
}

/// Réponse structurée composée par l'orchestrateur à chaque tour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Le message principal, éventuellement enrichi de guidance.
    pub message: String,
    /// Étapes de remédiation ordonnées (vide si aucune).
    pub steps: Vec<String>,
    /// Suggestions ordonnées par score décroissant.
    pub suggestions: Vec<Suggestion>,
    /// Astuce tirée au hasard dans le pool.
    pub tip: String,
    /// Question de suivi (vide si le tour n'en appelle pas).
    pub follow_up: String,
    /// Intention sous laquelle le tour est journalisé.
    pub intent: Intent,
}
