//! # Pipeline NLU — Compréhension du Message Utilisateur
//!
//! Ce module rassemble le traitement du langage de CyberGuard. La
//! [`NluPipeline`] est le point d'entrée que l'orchestrateur consomme :
//!
//! 1. **Classe** l'intention du message (mots-clés, premier match gagnant)
//! 2. **Retrouve** l'entrée de FAQ la plus proche (TF-IDF + cosinus)
//! 3. **Suggère** les questions voisines (top-K au-dessus du plancher)
//!
//! ## Flux de traitement
//!
//! ```text
//! Message utilisateur
//!   ├── classify_intent() → Intent          (pur, sans état)
//!   ├── answer()          → (réponse, score)
//!   │     └── score < 0.15 ou requête vide → texte de repli fixe
//!   └── search(k)         → [(question, score); ≤ k]
//! ```
//!
//! ## Sous-modules
//!
//! | Module | Responsabilité |
//! |--------|----------------|
//! | [`intent`] | énumération [`Intent`](intent::Intent) + classificateur à mots-clés |
//! | [`vectorizer`] | TF-IDF sur n-grammes de mots (1–3), vocabulaire borné |
//! | [`retriever`] | index de similarité immuable, `query`/`rank` |
//!
//! ## Concurrence
//!
//! La pipeline est immuable après construction (`&self` partout) —
//! partageable entre requêtes via `Arc` sans verrou.

/// Sous-module du classificateur d'intention à mots-clés.
pub mod intent;

/// Sous-module de l'index de similarité FAQ.
pub mod retriever;

/// Sous-module du vectoriseur TF-IDF.
pub mod vectorizer;

use std::sync::Arc;

use crate::core::KnowledgeBase;

use intent::{Intent, IntentClassifier};
use retriever::FaqRetriever;

/// Similarité minimale pour servir une réponse de FAQ telle quelle.
/// En dessous, [`NluPipeline::answer`] sert le texte de repli générique.
pub const MIN_SIMILARITY: f32 = 0.15;

/// Texte de repli quand aucune entrée de FAQ n'est assez proche.
const FALLBACK_ANSWER: &str = "Je n'ai pas une réponse précise pour cette question. \
    Voici quelques conseils généraux : évitez de cliquer sur des liens suspects, \
    utilisez des mots de passe robustes (12+ caractères), activez la MFA partout \
    où c'est possible. Pour les incidents ou questions spécifiques, contactez \
    l'équipe cybersécurité.";

/// Invitation à poser une question quand le message est vide.
const EMPTY_QUERY_PROMPT: &str = "Veuillez poser une question liée à la cybersécurité.";

/// Pipeline NLU complète — classification d'intention + récupération FAQ.
///
/// Construite une fois au démarrage sur le corpus de la
/// [`KnowledgeBase`] ; immuable ensuite.
pub struct NluPipeline {
    /// Corpus partagé (questions, réponses, astuces, guidance).
    kb: Arc<KnowledgeBase>,
    /// Index de similarité sur question + réponse + catégorie.
    retriever: FaqRetriever,
}

impl NluPipeline {
    /// Construit la pipeline : indexe le corpus complet de la FAQ.
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        let corpus = kb.corpus();
        let retriever = FaqRetriever::build(&corpus);
        tracing::info!(documents = retriever.len(), "pipeline NLU initialisée");
        Self { kb, retriever }
    }

    /// Classe l'intention du message. Pur, sans effet de bord.
    pub fn classify_intent(&self, text: &str) -> Intent {
        IntentClassifier::classify(text)
    }

    /// Retourne la meilleure réponse de FAQ et son score.
    ///
    /// Requête vide → invitation fixe, score 0.0, sans vectoriser.
    /// Score sous [`MIN_SIMILARITY`] → texte de repli générique (le
    /// score réel est conservé : l'orchestrateur s'en sert pour ses
    /// propres seuils).
    pub fn answer(&self, text: &str) -> (String, f32) {
        if text.trim().is_empty() {
            return (EMPTY_QUERY_PROMPT.to_string(), 0.0);
        }

        let (best_idx, best_score) = self.retriever.query(text);
        if best_score >= MIN_SIMILARITY {
            if let Some(entry) = self.kb.faq.get(best_idx) {
                return (entry.answer.clone(), best_score);
            }
        }
        (FALLBACK_ANSWER.to_string(), best_score)
    }

    /// Retourne jusqu'à `top_k` questions de FAQ voisines du message,
    /// avec leurs scores, triées par score décroissant.
    pub fn search(&self, text: &str, top_k: usize) -> Vec<(String, f32)> {
        self.retriever
            .rank(text, top_k)
            .into_iter()
            .filter_map(|(idx, score)| {
                self.kb.faq.get(idx).map(|e| (e.question.clone(), score))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FaqEntry;

    fn pipeline() -> NluPipeline {
        let kb = KnowledgeBase {
            faq: vec![
                FaqEntry {
                    question: "Comment détecter un email suspect ?".to_string(),
                    answer: "Vérifiez l'expéditeur, survolez les liens, méfiez-vous de l'urgence."
                        .to_string(),
                    category: "phishing".to_string(),
                },
                FaqEntry {
                    question: "Comment créer un mot de passe solide ?".to_string(),
                    answer: "Au moins 12 caractères, uniques par compte, via un gestionnaire."
                        .to_string(),
                    category: "mots de passe".to_string(),
                },
            ],
            tips: vec!["Activez la MFA.".to_string()],
            guidance: Default::default(),
        };
        NluPipeline::new(Arc::new(kb))
    }

    #[test]
    fn answer_returns_matching_entry() {
        let nlu = pipeline();
        let (answer, score) = nlu.answer("comment détecter un email suspect de phishing ?");
        assert!(score >= MIN_SIMILARITY);
        assert!(answer.contains("expéditeur"));
    }

    #[test]
    fn answer_empty_query_short_circuits() {
        let nlu = pipeline();
        let (answer, score) = nlu.answer("   ");
        assert_eq!(score, 0.0);
        assert!(answer.contains("poser une question"));
    }

    #[test]
    fn answer_low_confidence_falls_back() {
        let nlu = pipeline();
        let (answer, score) = nlu.answer("recette de la tarte aux pommes");
        assert!(score < MIN_SIMILARITY);
        assert!(answer.contains("conseils généraux"));
    }

    #[test]
    fn search_returns_question_labels() {
        let nlu = pipeline();
        let results = nlu.search("email suspect", 3);
        assert!(!results.is_empty());
        assert!(results[0].0.contains("email suspect"));
    }
}
