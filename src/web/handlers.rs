//! # Handlers HTTP — Les Endpoints de l'API
//!
//! Chaque fonction publique de ce module est un handler Axum, mappé à
//! une route dans [`super::create_router()`]. L'API est purement JSON —
//! le rendu revient au frontend.
//!
//! | Handler | Méthode | Retour | Usage |
//! |---------|---------|--------|-------|
//! | `index` | GET | JSON | bannière du service |
//! | `health` | GET | JSON | sonde de vivacité |
//! | `chat` | POST | JSON | un tour de conversation |
//! | `history` | GET | JSON | historique d'un utilisateur |
//! | `metrics` | GET | JSON | compteurs agrégés |
//! | `incidents` | GET | JSON | incidents ouverts |
//!
//! ## Session côté appelant
//!
//! `POST /chat` reçoit l'objet session du client et le renvoie mis à
//! jour dans la réponse — le serveur ne conserve aucun état de
//! conversation. Un client qui perd la session repart simplement
//! au repos.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::core::{AgentResponse, Session};
use crate::persistence::{IncidentRecord, TurnRecord};

/// Bannière du service, retournée sur `/`.
#[derive(Serialize)]
pub struct ServiceBanner {
    /// Toujours "online" si le processus répond.
    pub status: &'static str,
    /// Nom du service.
    pub service: &'static str,
}

/// Réponse de la sonde `/health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Toujours "healthy" si le processus répond.
    pub status: &'static str,
}

/// Corps de requête de `POST /chat`.
#[derive(Deserialize)]
pub struct ChatRequest {
    /// Message libre de l'utilisateur.
    pub message: String,
    /// Identifiant de l'utilisateur ; "anonymous" par défaut.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Session possédée par l'appelant ; neuve par défaut.
    #[serde(default)]
    pub session: Option<Session>,
}

/// Corps de réponse de `POST /chat` : la réponse de l'agent plus la
/// session mise à jour, rendue à son propriétaire.
#[derive(Serialize)]
pub struct ChatResponse {
    /// Identifiant de l'utilisateur traité.
    pub id: String,
    /// La réponse structurée de l'agent (aplatie dans le JSON).
    #[serde(flatten)]
    pub response: AgentResponse,
    /// Session mise à jour, à renvoyer au prochain tour.
    pub session: Session,
}

/// Paramètres de requête de `GET /history/{user_id}`.
#[derive(Deserialize)]
pub struct HistoryParams {
    /// Nombre maximal de tours retournés (défaut: 10).
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    10
}

/// GET `/` — bannière du service.
pub async fn index() -> Json<ServiceBanner> {
    Json(ServiceBanner {
        status: "online",
        service: "CyberGuard API",
    })
}

/// GET `/health` — sonde de vivacité.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// POST `/chat` — traite un tour de conversation.
///
/// Un échec du puits de persistance remonte en 500 — l'écriture du
/// journal fait partie du contrat du tour, elle n'est pas avalée.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let user_id = req.user_id.unwrap_or_else(|| "anonymous".to_string());
    let mut session = req.session.unwrap_or_default();

    let response = state
        .agent
        .respond(&req.message, &mut session, &user_id)
        .map_err(|e| {
            tracing::error!(error = %e, user_id, "échec du traitement du tour");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(ChatResponse {
        id: user_id,
        response,
        session,
    }))
}

/// GET `/history/{user_id}` — historique d'un utilisateur,
/// du plus récent au plus ancien.
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<TurnRecord>> {
    Json(state.store.history(&user_id, params.limit))
}

/// GET `/metrics` — compteurs agrégés, clé `nom_intention`.
pub async fn metrics(State(state): State<AppState>) -> Json<HashMap<String, u64>> {
    Json(state.store.metrics_summary())
}

/// GET `/incidents` — incidents de sécurité encore ouverts.
pub async fn incidents(State(state): State<AppState>) -> Json<Vec<IncidentRecord>> {
    Json(state.store.open_incidents())
}
