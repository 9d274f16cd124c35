//! # Collaborators Module
//!
//! Narrow async seams to the external services the core depends on:
//! translation, term expansion and question logging. Every implementation
//! keeps a bounded timeout and surfaces failures as `AppError`, which the
//! orchestrator downgrades to a best-effort fallback.

pub mod expander;
pub mod logger;
pub mod traits;
pub mod translator;

// Re-export main types for convenience
#[allow(unused_imports)]
pub use expander::{HttpTermExpander, NoopExpander};
#[allow(unused_imports)]
pub use logger::{FormLogger, NoopLogger};
#[allow(unused_imports)]
pub use traits::{ChatLogger, TermExpander, Translator};
#[allow(unused_imports)]
pub use translator::HttpTranslator;
