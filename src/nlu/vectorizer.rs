//! # Vectoriseur TF-IDF — Représentation du Corpus FAQ
//!
//! Le [`TfidfVectorizer`] projette chaque document (et chaque requête)
//! dans un espace vectoriel pondéré terme-fréquence / fréquence-inverse-
//! document, construit **une seule fois** sur le corpus complet au
//! démarrage et jamais muté ensuite.
//!
//! ## Pipeline de tokenisation
//!
//! ```text
//! Texte brut
//!   ├── 1. minuscules
//!   ├── 2. suppression des accents (décomposition NFD, marques éliminées)
//!   ├── 3. tokens \w+ (pattern mot)
//!   ├── 4. filtrage des mots vides français
//!   └── 5. n-grammes de mots, longueur 1 à 3
//! ```
//!
//! ## Pondération
//!
//! | Étape | Formule |
//! |-------|---------|
//! | tf | nombre d'occurrences brut |
//! | idf (lissé) | `ln((1 + n) / (1 + df)) + 1` |
//! | normalisation | L2 par vecteur |
//!
//! Le vocabulaire est borné à [`MAX_FEATURES`] termes — les plus
//! fréquents du corpus sont retenus, égalités départagées par ordre
//! lexicographique. Les termes d'une requête absents du vocabulaire
//! ajusté sont ignorés.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Taille maximale du vocabulaire ajusté.
pub const MAX_FEATURES: usize = 1000;

/// Longueurs de n-grammes de mots générés (1 à 3 inclus).
const NGRAM_RANGE: (usize, usize) = (1, 3);

/// Mots vides français — mots-outils sans valeur discriminante,
/// filtrés avant la génération des n-grammes.
const FRENCH_STOP_WORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "de", "du", "et", "ou", "mais", "donc", "car", "ni",
    "est", "sont", "a", "ai", "as", "ont", "ce", "ces", "cet", "cette", "se", "sa", "son", "ses",
    "il", "elle", "nous", "vous", "ils", "elles", "je", "tu", "mon", "ma", "mes",
];

/// Vectoriseur TF-IDF sur n-grammes de mots, immuable après `fit`.
pub struct TfidfVectorizer {
    /// Terme → index de colonne dans l'espace vectoriel.
    vocabulary: HashMap<String, usize>,
    /// Poids IDF par colonne, alignés sur `vocabulary`.
    idf: Vec<f32>,
    /// Pattern de token, compilé une fois.
    token_re: Regex,
}

impl TfidfVectorizer {
    /// Ajuste le vectoriseur sur un corpus de documents.
    ///
    /// Construit le vocabulaire (borné à [`MAX_FEATURES`]) et les poids
    /// IDF lissés. L'index retourné est définitif : aucune mutation
    /// n'a lieu pendant les requêtes.
    pub fn fit(corpus: &[String]) -> Self {
        let token_re = Regex::new(r"\w+").expect("pattern de token invalide");

        // Comptages corpus : occurrences totales et fréquence documentaire
        let mut total_counts: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u64> = HashMap::new();
        for doc in corpus {
            let terms = tokenize(&token_re, doc);
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *total_counts.entry(term.clone()).or_insert(0) += 1;
                seen.insert(term.as_str());
            }
            for term in seen {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        // Vocabulaire borné : les plus fréquents d'abord, égalités par
        // ordre lexicographique, puis indices en ordre alphabétique
        let mut terms: Vec<(String, u64)> = total_counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(MAX_FEATURES);
        let mut retained: Vec<String> = terms.into_iter().map(|(t, _)| t).collect();
        retained.sort();

        let n_docs = corpus.len() as f32;
        let mut vocabulary = HashMap::with_capacity(retained.len());
        let mut idf = Vec::with_capacity(retained.len());
        for (col, term) in retained.into_iter().enumerate() {
            let df = *doc_freq.get(&term).unwrap_or(&0) as f32;
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, col);
        }

        tracing::debug!(
            vocabulaire = vocabulary.len(),
            documents = corpus.len(),
            "vectoriseur TF-IDF ajusté"
        );

        Self {
            vocabulary,
            idf,
            token_re,
        }
    }

    /// Projette un texte dans l'espace vectoriel ajusté.
    ///
    /// Les termes hors vocabulaire sont ignorés. Le vecteur retourné est
    /// normalisé L2 ; un texte sans terme connu donne le vecteur nul.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.idf.len()];
        for term in tokenize(&self.token_re, text) {
            if let Some(&col) = self.vocabulary.get(&term) {
                vec[col] += 1.0;
            }
        }
        for (col, weight) in vec.iter_mut().enumerate() {
            *weight *= self.idf[col];
        }
        l2_normalize(&mut vec);
        vec
    }

    /// Nombre de termes du vocabulaire ajusté.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Tokenise un texte : minuscules, accents supprimés, tokens `\w+`,
/// mots vides filtrés, n-grammes de 1 à 3 mots.
fn tokenize(token_re: &Regex, text: &str) -> Vec<String> {
    let lowered = strip_accents(&text.to_lowercase());
    let words: Vec<&str> = token_re
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !FRENCH_STOP_WORDS.contains(w))
        .collect();

    let mut terms = Vec::new();
    for n in NGRAM_RANGE.0..=NGRAM_RANGE.1 {
        if words.len() < n {
            break;
        }
        for window in words.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

/// Supprime les accents par décomposition NFD : les marques combinantes
/// sont éliminées, le caractère de base est conservé.
fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalise un vecteur en place à la norme L2 unitaire.
/// Le vecteur nul reste nul.
fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vec.iter_mut() {
            *x /= norm;
        }
    }
}
