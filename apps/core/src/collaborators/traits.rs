use async_trait::async_trait;

use crate::error::AppError;

/// Defines the public interface for the translation collaborator.
///
/// This trait abstracts the specific provider, allowing different backends
/// (self-hosted service, remote API, test double) to be used interchangeably.
/// Callers must hand over already-masked text; on failure the orchestrator
/// degrades to the untranslated input instead of surfacing the error.
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translates text into the given ISO 639-1 target language.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AppError>;
}

/// Defines the public interface for the term-expansion collaborator.
///
/// Best-effort: suggests related German terms for a question that the
/// deterministic tiers could not place. Failures degrade to an empty set.
#[async_trait]
pub trait TermExpander: Send + Sync + 'static {
    /// Suggests up to `max_terms` related terms for the text.
    async fn expand(&self, text: &str, max_terms: usize) -> Result<Vec<String>, AppError>;
}

/// Defines the public interface for the question/answer logging collaborator.
///
/// Fire-and-forget from the orchestrator; a failed delivery is logged and
/// never blocks or alters the reply.
#[async_trait]
pub trait ChatLogger: Send + Sync + 'static {
    /// Records one question/reply pair.
    async fn log(&self, question: &str, reply: &str) -> Result<(), AppError>;
}
