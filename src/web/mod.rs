//! # Module Web — La Frontière Transport
//!
//! Couche de colle pure : accepte du texte libre plus un objet session
//! opaque et un identifiant utilisateur, retourne les champs de la
//! réponse de l'agent. Construite avec **Axum**, API JSON uniquement.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Client (frontend, CLI, curl)                         │
//! ├──────────────────────────────────────────────────────┤
//! │ Axum Router (ce module)                              │
//! │  ├── GET  /                   → bannière du service  │
//! │  ├── GET  /health             → sonde de vivacité    │
//! │  ├── POST /chat               → un tour de dialogue  │
//! │  ├── GET  /history/{user_id}  → historique           │
//! │  ├── GET  /metrics            → compteurs agrégés    │
//! │  └── GET  /incidents          → incidents ouverts    │
//! ├──────────────────────────────────────────────────────┤
//! │ CORS permissif (tower_http::cors)                    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sous-modules
//!
//! | Module | Responsabilité |
//! |--------|----------------|
//! | [`state`] | État partagé ([`AppState`]) |
//! | [`handlers`] | Handlers Axum de chaque route |

pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Crée le router Axum avec toutes les routes de l'application.
///
/// Le CORS est permissif — même posture que le service d'origine,
/// le frontend étant servi depuis une autre origine.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/history/{user_id}", get(handlers::history))
        .route("/metrics", get(handlers::metrics))
        .route("/incidents", get(handlers::incidents))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
