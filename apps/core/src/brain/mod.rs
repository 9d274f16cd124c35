//! # Brain Module
//!
//! Deterministic text engine for KlarBot. Turns a free-text customer
//! question into the best-matching knowledge entry without any model call.
//!
//! ## Components
//! - `lexicon`: immutable stopword / greeting / generic-term / protected-term tables
//! - `normalizer`: lowercase + punctuation + short-token + greeting stripping
//! - `keywords`: keyword sequence and subject token extraction
//! - `matcher`: ordered strategy tiers over the knowledge table
//! - `protect`: masking of translation-sensitive segments

pub mod keywords;
pub mod lexicon;
pub mod matcher;
pub mod normalizer;
pub mod protect;

// Re-export main types for convenience
#[allow(unused_imports)]
pub use keywords::KeywordExtractor;
#[allow(unused_imports)]
pub use lexicon::FilterLexicon;
#[allow(unused_imports)]
pub use matcher::{KnowledgeMatcher, MatchResult, MatchStrategy};
#[allow(unused_imports)]
pub use normalizer::TextNormalizer;
#[allow(unused_imports)]
pub use protect::{SegmentMap, SegmentProtector};
