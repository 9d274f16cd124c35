//! Keyword / Subject Extractor.
//!
//! Builds a keyword sequence and a single subject token from normalized
//! text, applying stopword and generic-term filtering.

use std::sync::Arc;

use super::lexicon::FilterLexicon;
use super::normalizer::TextNormalizer;

/// Extracts keywords and the sentence subject from free text.
///
/// Pipeline: normalize, drop stopwords, then drop generic industry terms --
/// the last step only when more than one keyword survived, so a question
/// consisting of a single generic term still yields it as a keyword.
pub struct KeywordExtractor {
    lexicon: Arc<FilterLexicon>,
    normalizer: TextNormalizer,
}

impl KeywordExtractor {
    pub fn new(lexicon: Arc<FilterLexicon>) -> Self {
        let normalizer = TextNormalizer::new(Arc::clone(&lexicon));
        Self {
            lexicon,
            normalizer,
        }
    }

    /// Extract the keyword sequence. May be empty, e.g. for a question made
    /// up entirely of stopwords. Order follows the input sentence;
    /// duplicates are kept and count separately during scoring.
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let mut keywords: Vec<String> = self
            .normalizer
            .normalize(text)
            .into_iter()
            .filter(|w| !self.lexicon.is_stopword(w))
            .collect();

        if keywords.len() > 1 {
            keywords.retain(|w| !self.lexicon.is_generic_term(w));
        }

        keywords
    }

    /// Extract the presumed grammatical subject: the first token surviving
    /// the keyword pipeline, or an empty string if none remain.
    pub fn subject(&self, text: &str) -> String {
        self.keywords(text).into_iter().next().unwrap_or_default()
    }
}
