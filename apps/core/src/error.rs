use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents a missing or malformed knowledge resource. Fatal at load
    /// time; the process refuses to serve until the resource is fixed.
    #[error("Knowledge resource error: {0}")]
    Knowledge(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents a failed call to an external collaborator (translator,
    /// term expander, form logger). Always recoverable at the orchestrator.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Represents data validation errors (e.g., empty message).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., invalid endpoint URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Collaborator(format!("HTTP error: {}", err))
    }
}
