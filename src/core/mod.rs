//! # Module Core — Types Fondamentaux du Domaine
//!
//! Ce module regroupe les **types fondamentaux** autour desquels tourne
//! tout CyberGuard :
//!
//! - [`KnowledgeBase`] — corpus statique chargé au démarrage : FAQ, astuces,
//!   et blocs de guidance par intention
//! - [`FaqEntry`] — une entrée de FAQ (question, réponse, catégorie)
//! - [`Guidance`] — enrichissement par intention (contexte, bonnes pratiques,
//!   erreurs courantes)
//! - [`Session`] / [`SessionState`] — état conversationnel possédé par
//!   l'appelant, une machine à deux états
//! - [`AgentResponse`] — la réponse structurée composée à chaque tour
//!
//! La [`KnowledgeBase`] est **immuable après chargement** : aucun composant
//! ne la modifie pendant la vie du processus. C'est ce qui rend les requêtes
//! concurrentes sûres sans verrou (voir [`FaqRetriever`](crate::nlu::retriever::FaqRetriever)).

/// Sous-module de la base de connaissances (chargement YAML, corpus, guidance).
pub mod knowledge_base;

/// Sous-module de la réponse structurée de l'agent.
pub mod response;

/// Sous-module de l'état de session conversationnelle.
pub mod session;

// Re-exports de commodité — permet d'écrire `crate::core::KnowledgeBase`.
pub use knowledge_base::{FaqEntry, Guidance, KbError, KnowledgeBase};
pub use response::{AgentResponse, Suggestion};
pub use session::{Session, SessionState};
