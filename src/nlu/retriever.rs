//! # FaqRetriever — Recherche par Similarité dans la FAQ
//!
//! Le [`FaqRetriever`] répond à une question simple : *quelle entrée de
//! la FAQ ressemble le plus à ce message ?* Il est construit une fois au
//! démarrage sur le corpus complet (question + réponse + catégorie par
//! entrée) et reste immuable ensuite — les requêtes concurrentes en
//! lecture seule sont sûres sans verrou.
//!
//! ## Contrat
//!
//! - [`query`](FaqRetriever::query) → `(meilleur_index, meilleur_score)`,
//!   arg-max stable (égalité → index le plus bas)
//! - [`rank`](FaqRetriever::rank) → top-K trié par score décroissant,
//!   entrées sous le plancher [`RELEVANCE_FLOOR`] éliminées
//!
//! ## Cas limite
//!
//! Une requête vide ou blanche **court-circuite** sans vectoriser :
//! score 0.0, classement vide. C'est aussi ce qui pilote la réponse
//! "précisez votre question" de l'orchestrateur.

use super::vectorizer::TfidfVectorizer;

/// Plancher de pertinence : les entrées sous ce score sont exclues du
/// classement.
pub const RELEVANCE_FLOOR: f32 = 0.10;

/// Index de similarité immuable sur le corpus FAQ.
pub struct FaqRetriever {
    /// Vectoriseur ajusté sur le corpus.
    vectorizer: TfidfVectorizer,
    /// Un vecteur L2-normalisé par document, dans l'ordre du corpus.
    matrix: Vec<Vec<f32>>,
}

impl FaqRetriever {
    /// Construit l'index : ajuste le vectoriseur puis projette chaque
    /// document du corpus.
    pub fn build(corpus: &[String]) -> Self {
        let vectorizer = TfidfVectorizer::fit(corpus);
        let matrix = corpus.iter().map(|d| vectorizer.transform(d)).collect();
        Self { vectorizer, matrix }
    }

    /// Similarités cosinus de la requête avec chaque document.
    fn similarities(&self, text: &str) -> Vec<f32> {
        let query_vec = self.vectorizer.transform(text);
        self.matrix
            .iter()
            .map(|doc| cosine_similarity(&query_vec, doc))
            .collect()
    }

    /// Retourne l'index et le score de la meilleure entrée.
    ///
    /// Arg-max stable : en cas d'égalité de score, l'index le plus bas
    /// gagne. Requête vide ou corpus vide → `(0, 0.0)` sans vectoriser.
    pub fn query(&self, text: &str) -> (usize, f32) {
        if text.trim().is_empty() || self.matrix.is_empty() {
            return (0, 0.0);
        }
        let sims = self.similarities(text);
        let mut best_idx = 0usize;
        let mut best_score = sims[0];
        for (idx, score) in sims.iter().enumerate().skip(1) {
            // strictement supérieur : les égalités gardent l'index le plus bas
            if *score > best_score {
                best_idx = idx;
                best_score = *score;
            }
        }
        (best_idx, best_score)
    }

    /// Retourne au plus `top_k` entrées triées par score décroissant,
    /// toutes au-dessus de [`RELEVANCE_FLOOR`].
    ///
    /// Si moins de `top_k` entrées passent le plancher, en retourne
    /// moins. Requête vide → classement vide, sans vectoriser.
    pub fn rank(&self, text: &str, top_k: usize) -> Vec<(usize, f32)> {
        if text.trim().is_empty() || self.matrix.is_empty() {
            return Vec::new();
        }
        let sims = self.similarities(text);
        let mut ranked: Vec<(usize, f32)> = sims.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
            .into_iter()
            .filter(|(_, score)| *score >= RELEVANCE_FLOOR)
            .take(top_k)
            .collect()
    }

    /// Nombre de documents indexés.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// Vrai si l'index est vide.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}

/// Similarité cosinus entre deux vecteurs.
///
/// Vecteurs de tailles différentes, vides, ou de norme nulle → 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "Comment détecter un email suspect ? Vérifiez l'expéditeur et les liens. phishing"
                .to_string(),
            "Comment créer un mot de passe solide ? Utilisez 12 caractères variés. mots de passe"
                .to_string(),
            "Comment me connecter au VPN ? Téléchargez le client depuis le portail. vpn"
                .to_string(),
        ]
    }

    // ─── cosine_similarity ─────────────────────────────────────

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![0.5, 0.5, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_mismatched_or_empty() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0], &[0.0]), 0.0);
    }

    // ─── query ─────────────────────────────────────────────────

    #[test]
    fn query_finds_best_match() {
        let r = FaqRetriever::build(&corpus());
        let (idx, score) = r.query("j'ai reçu un email suspect de phishing");
        assert_eq!(idx, 0);
        assert!(score > 0.0);
    }

    #[test]
    fn query_empty_short_circuits() {
        let r = FaqRetriever::build(&corpus());
        assert_eq!(r.query(""), (0, 0.0));
        assert_eq!(r.query("   "), (0, 0.0));
    }

    #[test]
    fn query_tie_keeps_lowest_index() {
        // deux documents identiques : l'arg-max doit rester sur le premier
        let docs = vec![
            "vpn tunnel distant".to_string(),
            "vpn tunnel distant".to_string(),
        ];
        let r = FaqRetriever::build(&docs);
        let (idx, _) = r.query("vpn tunnel");
        assert_eq!(idx, 0);
    }

    // ─── rank ──────────────────────────────────────────────────

    #[test]
    fn rank_is_bounded_and_sorted() {
        let r = FaqRetriever::build(&corpus());
        let ranked = r.rank("email suspect mot de passe vpn", 2);
        assert!(ranked.len() <= 2);
        for pair in ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        for (_, score) in &ranked {
            assert!(*score >= RELEVANCE_FLOOR);
        }
    }

    #[test]
    fn rank_drops_entries_below_floor() {
        let r = FaqRetriever::build(&corpus());
        // aucun terme du corpus : toutes les similarités sont nulles
        let ranked = r.rank("astronomie galaxie nébuleuse", 3);
        assert!(ranked.is_empty());
    }

    #[test]
    fn rank_empty_query_is_empty() {
        let r = FaqRetriever::build(&corpus());
        assert!(r.rank("", 3).is_empty());
        assert!(r.rank("   ", 3).is_empty());
    }
}
