//! Text Normalizer - deterministic token pipeline.
//!
//! Lowercases, strips punctuation, drops short fragments and leading
//! greetings. Pure: same input always yields the same token sequence.

use std::sync::Arc;

use super::lexicon::FilterLexicon;

/// Tokens shorter than this are noise fragments
const MIN_TOKEN_CHARS: usize = 3;

/// Normalizes raw user text into an ordered token sequence.
pub struct TextNormalizer {
    lexicon: Arc<FilterLexicon>,
}

impl TextNormalizer {
    pub fn new(lexicon: Arc<FilterLexicon>) -> Self {
        Self { lexicon }
    }

    /// Characters that survive normalization: ASCII lowercase plus the
    /// German letters. Everything else acts as a token separator.
    fn is_word_char(c: char) -> bool {
        c.is_ascii_lowercase() || matches!(c, 'ä' | 'ö' | 'ü' | 'ß')
    }

    /// Normalize text into an ordered token sequence.
    ///
    /// Steps, in order: lowercase, split on any non-word character, drop
    /// tokens shorter than 3 characters, strip greeting words from the head
    /// of the sequence. Greeting stripping runs to a fixpoint so multi-word
    /// greetings ("guten tag") are fully consumed and the function stays
    /// idempotent; the length guard keeps a bare greeting intact.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        let mut tokens: Vec<String> = lowered
            .split(|c: char| !Self::is_word_char(c))
            .filter(|t| !t.is_empty() && t.chars().count() >= MIN_TOKEN_CHARS)
            .map(|t| t.to_string())
            .collect();

        while tokens.len() > 1 && self.lexicon.is_greeting(&tokens[0]) {
            tokens.remove(0);
        }

        tokens
    }
}
