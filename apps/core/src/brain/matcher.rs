//! Knowledge Matcher - ordered strategy tiers over the knowledge table.
//!
//! Cheap deterministic checks first, statistical fallback last: exact match,
//! subject match, keyword-overlap score, fuzzy similarity, and similarity
//! over an externally expanded term set. First successful tier wins.
//!
//! The matcher is synchronous and collaborator-free; expansion terms are
//! obtained by the caller and passed in, so every tier is testable without
//! a network dependency.

use std::fmt;
use std::sync::Arc;

use crate::knowledge::KnowledgeEntry;

use super::keywords::KeywordExtractor;
use super::lexicon::FilterLexicon;

/// Minimum aggregate occurrence count for a keyword-overlap match. Scores in
/// that tier are raw integral substring counts, so one occurrence with a
/// strictly highest total qualifies. The normalized 0.8 bar below applies to
/// the similarity tiers only.
const MIN_KEYWORD_OCCURRENCES: usize = 1;

/// Jaro-Winkler bar for the similarity tiers. An entry is accepted only if
/// its best (keyword, pattern word) pair exceeds this.
const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Which strategy tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Question equals a pattern, or contains it at equal word count.
    Exact,
    /// The extracted subject token appears in an entry's subject list.
    Subject,
    /// Highest aggregate keyword-occurrence count across patterns.
    KeywordScore,
    /// Best Jaro-Winkler pair over the base keyword set.
    Similarity,
    /// Best Jaro-Winkler pair over the expanded keyword set.
    Expanded,
    /// No tier matched; the caller substitutes the fallback reply.
    None,
}

impl MatchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::Subject => "subject",
            MatchStrategy::KeywordScore => "keyword_score",
            MatchStrategy::Similarity => "similarity",
            MatchStrategy::Expanded => "expanded",
            MatchStrategy::None => "none",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of a matching run. One per request.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub entry: Option<&'a KnowledgeEntry>,
    pub score: f64,
    pub strategy: MatchStrategy,
}

impl<'a> MatchResult<'a> {
    fn hit(entry: &'a KnowledgeEntry, score: f64, strategy: MatchStrategy) -> Self {
        Self {
            entry: Some(entry),
            score,
            strategy,
        }
    }

    /// The sentinel "no match" result.
    pub fn none() -> Self {
        Self {
            entry: None,
            score: 0.0,
            strategy: MatchStrategy::None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }
}

/// Matches a German-normalized question against the knowledge table.
pub struct KnowledgeMatcher {
    extractor: KeywordExtractor,
}

impl KnowledgeMatcher {
    pub fn new(lexicon: Arc<FilterLexicon>) -> Self {
        Self {
            extractor: KeywordExtractor::new(lexicon),
        }
    }

    /// Run the deterministic tiers and the base-keyword similarity tier.
    /// Table order is the tie-break throughout: the first entry reaching the
    /// best score wins.
    pub fn find<'a>(&self, entries: &'a [KnowledgeEntry], question: &str) -> MatchResult<'a> {
        if let Some(entry) = self.exact_match(entries, question) {
            return MatchResult::hit(entry, 1.0, MatchStrategy::Exact);
        }

        if let Some(entry) = self.subject_match(entries, question) {
            return MatchResult::hit(entry, 1.0, MatchStrategy::Subject);
        }

        let keywords = self.extractor.keywords(question);
        if keywords.is_empty() {
            return MatchResult::none();
        }

        if let Some((entry, count)) = self.keyword_score_match(entries, &keywords) {
            return MatchResult::hit(entry, count as f64, MatchStrategy::KeywordScore);
        }

        if let Some((entry, score)) = self.similarity_match(entries, &keywords) {
            return MatchResult::hit(entry, score, MatchStrategy::Similarity);
        }

        MatchResult::none()
    }

    /// Rerun the similarity scan with the keyword set extended by externally
    /// suggested related terms. Called after `find` returned no match.
    pub fn find_expanded<'a>(
        &self,
        entries: &'a [KnowledgeEntry],
        question: &str,
        extra_terms: &[String],
    ) -> MatchResult<'a> {
        let mut keywords = self.extractor.keywords(question);
        keywords.extend(
            extra_terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        );

        if keywords.is_empty() {
            return MatchResult::none();
        }

        if let Some((entry, score)) = self.similarity_match(entries, &keywords) {
            return MatchResult::hit(entry, score, MatchStrategy::Expanded);
        }

        MatchResult::none()
    }

    /// Tier 1: lowercase-trimmed equality, or substring containment at equal
    /// word count (the two then differ only in case and punctuation).
    fn exact_match<'a>(
        &self,
        entries: &'a [KnowledgeEntry],
        question: &str,
    ) -> Option<&'a KnowledgeEntry> {
        let cleaned = question.trim().to_lowercase();
        if cleaned.is_empty() {
            return None;
        }
        let question_words = cleaned.split_whitespace().count();

        entries.iter().find(|entry| {
            entry.patterns.iter().any(|pattern| {
                let p = pattern.trim().to_lowercase();
                cleaned == p
                    || (question_words == p.split_whitespace().count() && cleaned.contains(&p))
            })
        })
    }

    /// Tier 2: case-insensitive lookup of the subject token in declared
    /// subject lists.
    fn subject_match<'a>(
        &self,
        entries: &'a [KnowledgeEntry],
        question: &str,
    ) -> Option<&'a KnowledgeEntry> {
        let subject = self.extractor.subject(question);
        if subject.is_empty() {
            return None;
        }

        entries.iter().find(|entry| {
            entry
                .subject
                .as_ref()
                .is_some_and(|subjects| subjects.iter().any(|s| s.to_lowercase() == subject))
        })
    }

    /// Tier 3: per entry, sum non-overlapping occurrences of every keyword
    /// in every pattern; strictly highest total wins.
    fn keyword_score_match<'a>(
        &self,
        entries: &'a [KnowledgeEntry],
        keywords: &[String],
    ) -> Option<(&'a KnowledgeEntry, usize)> {
        let mut best: Option<(&KnowledgeEntry, usize)> = None;

        for entry in entries {
            let mut total = 0;
            for pattern in &entry.patterns {
                let p = pattern.to_lowercase();
                for keyword in keywords {
                    total += p.matches(keyword.as_str()).count();
                }
            }

            if total >= MIN_KEYWORD_OCCURRENCES && best.map_or(true, |(_, s)| total > s) {
                best = Some((entry, total));
            }
        }

        best
    }

    /// Tiers 4/5: best Jaro-Winkler similarity over (keyword, pattern word)
    /// pairs; an entry scores its best pair, and the strictly highest entry
    /// is accepted only above the 0.8 bar.
    fn similarity_match<'a>(
        &self,
        entries: &'a [KnowledgeEntry],
        keywords: &[String],
    ) -> Option<(&'a KnowledgeEntry, f64)> {
        let mut best: Option<(&KnowledgeEntry, f64)> = None;

        for entry in entries {
            let mut entry_score = 0.0f64;
            for pattern in &entry.patterns {
                let p = pattern.to_lowercase();
                for word in p.split_whitespace() {
                    for keyword in keywords {
                        let similarity = strsim::jaro_winkler(keyword, word);
                        if similarity > entry_score {
                            entry_score = similarity;
                        }
                    }
                }
            }

            if best.map_or(true, |(_, s)| entry_score > s) {
                best = Some((entry, entry_score));
            }
        }

        best.filter(|(_, score)| *score > SIMILARITY_THRESHOLD)
    }
}
