//! # Classificateur d'Intention de l'Utilisateur
//!
//! L'[`IntentClassifier`] détermine l'**intention** de l'utilisateur à
//! partir de son message, par correspondance de mots-clés. L'intention
//! décide de la branche de l'orchestrateur :
//!
//! | Intent | Signification | Exemple |
//! |--------|---------------|---------|
//! | [`Greeting`](Intent::Greeting) | Salutation | "bonjour" |
//! | [`PhishingIncident`](Intent::PhishingIncident) | Incident de phishing | "j'ai cliqué sur un lien suspect" |
//! | [`PasswordSecurity`](Intent::PasswordSecurity) | Mots de passe | "mot de passe bloqué" |
//! | [`Mfa`](Intent::Mfa) | Authentification multifacteur | "activer la 2FA" |
//! | [`Vpn`](Intent::Vpn) | Accès distant | "connexion au VPN" |
//! | [`Updates`](Intent::Updates) | Mises à jour | "installer le patch" |
//! | [`DataSensitivity`](Intent::DataSensitivity) | Données sensibles | "partager un fichier confidentiel" |
//! | [`IncidentReporting`](Intent::IncidentReporting) | Signalement | "signaler un incident" |
//! | [`General`](Intent::General) | Aucun mot-clé reconnu | (défaut) |
//!
//! ## Politique premier-match-gagnant
//!
//! Les paires (intention, mots-clés) sont évaluées dans un **ordre de
//! priorité fixe** avec court-circuit au premier match — pas de meilleur
//! score. Les salutations sont testées avant tout le reste,
//! inconditionnellement. Un mot-clé partagé entre deux intentions est
//! donc résolu par l'ordre de la liste : une formulation ambiguë peut
//! être mal classée, compromis assumé entre simplicité et précision.
//!
//! ## Normalisation
//!
//! Volontairement légère — pas de pliage d'accents complet :
//! minuscules, apostrophes et traits d'union remplacés par des espaces,
//! é/è/ê ramenés à e. Le matching est une recherche de sous-chaîne sur
//! le texte normalisé.

use serde::{Deserialize, Serialize};

/// Intention classée à partir du message de l'utilisateur.
///
/// Énumération fermée. [`PhishingFollowup`](Intent::PhishingFollowup)
/// n'est **jamais** produite par le classificateur : c'est l'étiquette
/// synthétique sous laquelle l'orchestrateur journalise la branche de
/// suivi phishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Salutation — testée avant toutes les autres.
    Greeting,
    /// Incident de phishing potentiel (déclenche le flux à deux tours).
    PhishingIncident,
    /// Sécurité des mots de passe.
    PasswordSecurity,
    /// Authentification multifacteur.
    Mfa,
    /// VPN et accès distant.
    Vpn,
    /// Mises à jour et correctifs.
    Updates,
    /// Données sensibles et partage de fichiers.
    DataSensitivity,
    /// Signalement d'incident de sécurité.
    IncidentReporting,
    /// Défaut quand aucun mot-clé ne matche.
    General,
    /// Étiquette synthétique du second tour phishing — jamais classée.
    PhishingFollowup,
}

impl Intent {
    /// Nom stable de l'intention, utilisé comme clé de guidance et
    /// comme étiquette de journalisation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::PhishingIncident => "phishing_incident",
            Intent::PasswordSecurity => "password_security",
            Intent::Mfa => "mfa",
            Intent::Vpn => "vpn",
            Intent::Updates => "updates",
            Intent::DataSensitivity => "data_sensitivity",
            Intent::IncidentReporting => "incident_reporting",
            Intent::General => "general",
            Intent::PhishingFollowup => "phishing_followup",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mots-clés de salutation — testés avant la table de priorité.
const GREETING_KEYWORDS: &[&str] = &["bonjour", "salut", "bonsoir", "hello", "hi", "hey", "coucou"];

/// Table de priorité : paires (intention, mots-clés), évaluées dans
/// l'ordre. L'ordre EST le contrat — le premier match gagne.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::PhishingIncident,
        &[
            "phishing",
            "hameçonnage",
            "hameconnage",
            "email suspect",
            "mail suspect",
            "lien suspect",
            "lien douteux",
            "ai clique",
            "j ai clique",
            "clique sur",
            "piege",
            "arnaque",
            "scam",
            "frauduleux",
            "usurpation",
            "recu un mail",
            "email bizarre",
            "suspect",
            "douteux",
            "etrange",
        ],
    ),
    (
        Intent::PasswordSecurity,
        &[
            "mot de passe",
            "password",
            "mdp",
            "gestionnaire",
            "complexe",
            "securise",
            "robuste",
            "fort",
            "faible",
            "creer un mot",
            "changer mot",
            "oublie mot",
            "reset password",
            "perdu mot",
            "bloque",
            "verrouille",
            "probleme mot",
            "compte bloque",
        ],
    ),
    (
        Intent::Mfa,
        &[
            "mfa",
            "2fa",
            "authentification",
            "double authentification",
            "multifacteur",
            "code",
            "verification",
            "token",
            "otp",
            "deux facteurs",
            "validation",
        ],
    ),
    (
        Intent::Vpn,
        &[
            "vpn",
            "reseau",
            "a distance",
            "remote",
            "connexion",
            "distant",
            "tunnel",
            "wifi public",
            "reseau public",
            "travail distance",
            "teletravail",
        ],
    ),
    (
        Intent::Updates,
        &[
            "mise a jour",
            "maj",
            "patch",
            "correctif",
            "update",
            "installer",
            "mettre a jour",
            "version",
            "upgrade",
        ],
    ),
    (
        Intent::DataSensitivity,
        &[
            "donnees sensibles",
            "donnees",
            "rgpd",
            "confidentiel",
            "partage",
            "fichier",
            "document",
            "transfert",
            "sensitive",
            "partager fichier",
            "envoyer fichier",
            "donnee",
        ],
    ),
    (
        Intent::IncidentReporting,
        &[
            "incident",
            "signaler",
            "securite",
            "compromis",
            "support",
            "alerte",
            "probleme",
            "attaque",
            "breach",
            "violation",
            "contacter",
            "aide",
            "urgence",
        ],
    ),
];

/// Classificateur d'intention par listes de mots-clés ordonnées.
///
/// Fonction pure du texte normalisé — aucun état caché, aucun effet de
/// bord. Sans coût de construction : les tables sont statiques.
pub struct IntentClassifier;

impl IntentClassifier {
    /// Normalisation légère du texte avant matching.
    ///
    /// Minuscules ; apostrophes (droite et typographique) et traits
    /// d'union → espace ; é/è/ê → e. Pas de pliage d'accents complet.
    fn normalize(text: &str) -> String {
        text.to_lowercase()
            .replace(['\'', '’', '-'], " ")
            .replace(['é', 'è', 'ê'], "e")
    }

    /// Classe l'intention d'un message.
    ///
    /// Premier match gagnant sur le texte normalisé :
    /// 1. salutations, inconditionnellement en tête ;
    /// 2. la table [`INTENT_KEYWORDS`] dans l'ordre ;
    /// 3. [`Intent::General`] si rien ne matche.
    pub fn classify(text: &str) -> Intent {
        let t = Self::normalize(text);

        if GREETING_KEYWORDS.iter().any(|k| t.contains(k)) {
            return Intent::Greeting;
        }

        for (intent, keywords) in INTENT_KEYWORDS {
            if keywords.iter().any(|k| t.contains(k)) {
                return *intent;
            }
        }

        Intent::General
    }
}
