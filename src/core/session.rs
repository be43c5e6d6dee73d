//! # Session — État Conversationnel Possédé par l'Appelant
//!
//! Une [`Session`] existe par conversation et appartient à l'appelant :
//! la couche transport la reçoit avec chaque requête et la renvoie avec
//! chaque réponse. L'orchestrateur la lit et la mute, mais ne possède
//! jamais son cycle de vie ni son stockage.
//!
//! ## Machine à états
//!
//! ```text
//! ┌──────┐  phishing_incident   ┌───────────────────────────┐
//! │ Idle │ ───────────────────▶ │ AwaitingPhishingFollowup  │
//! └──────┘ ◀─────────────────── └───────────────────────────┘
//!            tour suivant (inconditionnel, avant toute réponse)
//! ```
//!
//! Il y a au plus **un** flux en attente à la fois ; le traiter le
//! réinitialise toujours avant de composer la réponse.

use serde::{Deserialize, Serialize};

/// Flux en attente dans la conversation.
///
/// Variante typée — pas de clé magique dans un dictionnaire : l'état
/// possible est fermé et vérifié par le compilateur.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Aucun flux en attente — chaque tour part de la classification.
    #[default]
    Idle,
    /// Le prochain tour est routé vers le suivi phishing, quel que soit
    /// son contenu textuel.
    AwaitingPhishingFollowup,
}

/// État mutable d'une conversation, un exemplaire par appelant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Flux en attente, le cas échéant.
    #[serde(default)]
    pub pending_flow: SessionState,
}

impl Session {
    /// Crée une session neuve, sans flux en attente.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vrai si le prochain tour doit être routé vers le suivi phishing.
    pub fn awaiting_phishing_followup(&self) -> bool {
        self.pending_flow == SessionState::AwaitingPhishingFollowup
    }

    /// Arme le suivi phishing pour le prochain tour.
    pub fn arm_phishing_followup(&mut self) {
        self.pending_flow = SessionState::AwaitingPhishingFollowup;
    }

    /// Réinitialise le flux en attente.
    pub fn clear_pending(&mut self) {
        self.pending_flow = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert!(!Session::new().awaiting_phishing_followup());
    }

    #[test]
    fn arm_then_clear() {
        let mut s = Session::new();
        s.arm_phishing_followup();
        assert!(s.awaiting_phishing_followup());
        s.clear_pending();
        assert!(!s.awaiting_phishing_followup());
    }

    #[test]
    fn roundtrips_through_json() {
        let mut s = Session::new();
        s.arm_phishing_followup();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("awaiting_phishing_followup"));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert!(back.awaiting_phishing_followup());
    }
}
