//! # État de l'Application Web
//!
//! L'[`AppState`] est le contexte partagé entre tous les handlers Axum.
//! Tout y est immuable ou verrouillé en interne : l'état se clone
//! librement par requête.
//!
//! Aucune session n'y vit — l'état conversationnel appartient à
//! l'appelant et voyage dans le corps des requêtes (voir
//! [`handlers::chat`](super::handlers::chat)).

use std::sync::Arc;

use crate::orchestrator::Orchestrator;
use crate::persistence::ConversationStore;

/// État partagé de l'application Axum.
#[derive(Clone)]
pub struct AppState {
    /// Orchestrateur du dialogue, construit à la racine de composition.
    pub agent: Arc<Orchestrator>,
    /// Puits de persistance, pour les lectures (historique, compteurs).
    pub store: Arc<ConversationStore>,
}
