//! Filter Lexicon - immutable word tables for the text engine.
//!
//! Bundles the German stopword set, greeting words, generic industry terms
//! and the protected product-code literals. Built once at startup and shared
//! read-only across all requests.

use std::collections::HashSet;

/// Stopwords for German language
const STOPWORDS_DE: &[&str] = &[
    // Articles & determiners
    "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "einem", "einer", "etwas",
    "dies", "diese", "dieser", "dieses", "jenes", "jene", "jener", "solche", "erzähl", "geht",
    "manche", "alle", "jede", "jeder", "jedes", "es", "gibt", "aus", "brauche", "meine",
    "stellen", "erzählen",
    // Pronouns
    "ich", "du", "er", "sie", "wir", "ihr", "man", "mich", "dich", "ihn", "uns", "euch", "ihnen",
    "ihm", "mein", "mehr",
    // Question words
    "wie", "wo", "was", "wer", "wen", "wem", "wessen", "möglich", "bieten", "an", "welche",
    "welcher", "welches", "warum", "wieso", "weshalb", "wohin", "woher",
    // Prepositions
    "in", "im", "ins", "am", "auf", "für", "von", "mit", "ohne", "über", "unter", "bei", "durch",
    "gegen", "um", "zu", "zum", "zur", "nach", "vor", "hinter", "neben", "zwischen", "entlang",
    "außer", "innerhalb", "außerhalb",
    // Auxiliary verbs
    "bin", "bist", "ist", "sind", "seid", "war", "waren", "wirst", "wurde", "wurden", "habe",
    "hast", "hat", "haben", "habt", "hatte", "hatten",
    // Modal verbs
    "kann", "kannst", "können", "könnt", "könnte", "muss", "musst", "müssen", "müsst", "müsste",
    "soll", "sollst", "sollen", "sollt", "sollte", "sollten", "darf", "darfst", "dürfen",
    "dürft", "dürfte", "will", "willst", "wollen", "wollt", "wollte", "wollten", "möchte",
    "möchtest", "möchten", "möchtet",
    // Common verbs that never carry the subject
    "finden", "prüfen", "sehen", "anzeigen", "zeigen", "bekommen", "holen", "machen", "brauchen",
    "suchen", "geben", "nehmen", "gehen", "kommen", "erhalten", "laden", "vergleichen", "nutzen",
    "benutzen", "verwenden", "welchen", "funktioniert", "funktionieren",
    // Politeness particles
    "bitte", "danke",
    // Adverbs / filler words
    "so", "auch", "nur", "schon", "noch", "dann", "danach", "jetzt", "heute", "gestern",
    "morgen", "bald", "gleich", "hier", "dort", "da", "mal", "nun", "basierend", "basiert",
    "empfehlen", "budget",
    // Conjunctions
    "und", "oder", "aber", "doch", "jedoch", "denn", "falls", "wenn", "weil", "ob",
    "beziehungsweise", "bzw",
    // Other non-subject particles
    "ja", "nein", "okay", "ok", "eben", "halt", "gern", "mir", "ihre",
];

/// Greeting words stripped from the head of longer sentences
const GREETINGS: &[&str] = &["hallo", "hi", "hello", "guten", "tag", "morgen"];

/// Industry nouns too generic to disambiguate a question on their own.
/// Only filtered when more than one keyword survives, so a question that
/// consists of nothing else still yields a keyword.
const GENERIC_TERMS: &[&str] = &[
    "etiketten",
    "drucker",
    "gerät",
    "geräte",
    "artikel",
    "etikett",
    "drucksysteme",
    "cpm",
    "druckt",
    "software",
    "informationen",
];

/// Product-code literals that must survive translation unchanged.
/// Matched case-insensitively, so spelling variants collapse into these.
const PROTECTED_TERMS: &[&str] = &["CPM-200", "CPM200", "CPM 200", "CPM-100", "CPM100", "CPM 100"];

/// Immutable word tables injected into the normalizer, extractor and
/// segment protector. Never mutated after construction.
pub struct FilterLexicon {
    stopwords: HashSet<String>,
    greetings: HashSet<String>,
    generic_terms: HashSet<String>,
    protected_terms: Vec<String>,
}

impl Default for FilterLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterLexicon {
    /// Build the lexicon from the compiled-in German tables.
    pub fn new() -> Self {
        let stopwords: HashSet<String> = STOPWORDS_DE.iter().map(|s| s.to_lowercase()).collect();
        let greetings: HashSet<String> = GREETINGS.iter().map(|s| s.to_lowercase()).collect();
        let generic_terms: HashSet<String> =
            GENERIC_TERMS.iter().map(|s| s.to_lowercase()).collect();

        // Longest-first so "CPM 200" is consumed before any shorter variant
        // could split it during masking.
        let mut protected_terms: Vec<String> =
            PROTECTED_TERMS.iter().map(|s| s.to_string()).collect();
        protected_terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

        Self {
            stopwords,
            greetings,
            generic_terms,
            protected_terms,
        }
    }

    /// Check if a word is a German stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Check if a word is a greeting
    pub fn is_greeting(&self, word: &str) -> bool {
        self.greetings.contains(&word.to_lowercase())
    }

    /// Check if a word is a generic industry term
    pub fn is_generic_term(&self, word: &str) -> bool {
        self.generic_terms.contains(&word.to_lowercase())
    }

    /// Protected literals, longest first
    pub fn protected_terms(&self) -> &[String] {
        &self.protected_terms
    }
}
