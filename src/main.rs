#![allow(dead_code)]
//! # CyberGuard — Assistant de Sensibilisation à la Cybersécurité
//!
//! **Point d'entrée principal** de l'application.
//!
//! CyberGuard est un chatbot francophone de sensibilisation : il classe
//! chaque message dans une intention (mots-clés, premier match gagnant),
//! retrouve l'entrée de FAQ la plus proche (TF-IDF + similarité
//! cosinus), et compose une réponse structurée — message, étapes de
//! remédiation, suggestions, astuce — tout en journalisant l'échange.
//! Un flux à deux tours gère les incidents de phishing.
//!
//! ## Flux d'initialisation
//!
//! ```text
//! main()
//!   ├── Configure tracing/logging (RUST_LOG)
//!   ├── Charge la base de connaissances YAML (fatal si absente)
//!   ├── Ouvre le journal de conversations (fichier JSON)
//!   ├── Construit la pipeline NLU (index TF-IDF sur la FAQ)
//!   ├── Construit l'orchestrateur (racine de composition — pas de
//!   │   singleton paresseux : l'instance est injectée explicitement)
//!   └── Démarre le serveur axum
//! ```
//!
//! ## Configuration
//!
//! | Variable | Défaut | Rôle |
//! |----------|--------|------|
//! | `CYBERGUARD_KB` | `data/knowledge_base.yaml` | base de connaissances |
//! | `CYBERGUARD_STORE` | `data/conversations.json` | journal persistant |
//! | `CYBERGUARD_ADDR` | `127.0.0.1:8000` | adresse d'écoute |
//! | `RUST_LOG` | `info` | niveau de log |
//!
//! ## Exemple
//!
//! ```bash
//! cargo run
//! curl -X POST localhost:8000/chat \
//!   -H 'content-type: application/json' \
//!   -d '{"message": "bonjour"}'
//! ```

/// Module `core` — types fondamentaux : KnowledgeBase, Session, AgentResponse.
mod core;

/// Module `nlu` — classification d'intention et récupération TF-IDF.
mod nlu;

/// Module `orchestrator` — la machine à états conversationnelle.
mod orchestrator;

/// Module `persistence` — journal des conversations, incidents, compteurs.
mod persistence;

/// Module `web` — serveur axum, la frontière transport JSON.
mod web;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::core::KnowledgeBase;
use crate::nlu::NluPipeline;
use crate::orchestrator::Orchestrator;
use crate::persistence::ConversationStore;
use crate::web::state::AppState;

/// Lit une variable d'environnement, avec repli sur une valeur par défaut.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🛡️ CyberGuard — démarrage...");

    // La base de connaissances est le corpus du système : son absence
    // est une erreur fatale de démarrage, pas un état dégradé.
    let kb_path = PathBuf::from(env_or("CYBERGUARD_KB", "data/knowledge_base.yaml"));
    let kb = Arc::new(
        KnowledgeBase::load(&kb_path)
            .with_context(|| format!("échec du chargement de {}", kb_path.display()))?,
    );

    let store_path = env_or("CYBERGUARD_STORE", "data/conversations.json");
    let store = Arc::new(
        ConversationStore::open(&store_path)
            .with_context(|| format!("échec de l'ouverture du journal {store_path}"))?,
    );
    tracing::info!(path = %store.path().display(), "journal de conversations ouvert");

    // L'index TF-IDF est construit ici, une fois, sur le corpus complet —
    // immuable ensuite, donc partageable entre requêtes sans verrou.
    let nlu = Arc::new(NluPipeline::new(kb.clone()));
    let agent = Arc::new(Orchestrator::new(nlu, kb, store.clone()));

    let state = AppState { agent, store };
    let app = web::create_router(state);

    let addr = env_or("CYBERGUARD_ADDR", "127.0.0.1:8000");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind impossible sur {addr}"))?;
    tracing::info!("🚀 CyberGuard à l'écoute sur http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
