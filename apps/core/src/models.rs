use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_language() -> String {
    "de".to_string()
}

/// An incoming customer question. This is the full request contract of the
/// core; the host HTTP layer adds nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    /// The raw question text, in any supported language.
    #[validate(length(min = 1))]
    pub message: String,
    /// Target language code for the reply (ISO 639-1). Defaults to German.
    #[serde(default = "default_language")]
    pub language: String,
}

impl ChatRequest {
    /// Convenience constructor for a German-language request.
    pub fn german(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            language: default_language(),
        }
    }
}

/// The reply returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The answer text, possibly containing inline markup from the
    /// knowledge base.
    pub reply: String,
}
