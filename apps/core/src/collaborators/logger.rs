//! Question/answer logging collaborator.
//!
//! Posts every question/reply pair to a spreadsheet-backed form endpoint as
//! a url-encoded submission. Delivery is best-effort: the orchestrator fires
//! it off the request path and swallows failures with a warning.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::error::AppError;

use super::traits::ChatLogger;

const LOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Form field ids expected by the logging form.
const FIELD_QUESTION: &str = "entry.2072247045";
const FIELD_ANSWER: &str = "entry.455345515";
const FIELD_TIMESTAMP: &str = "entry.1378060286";

/// Logger posting to a spreadsheet-backed form endpoint.
pub struct FormLogger {
    endpoint: Url,
    client: Client,
}

impl FormLogger {
    pub fn new(endpoint: &str) -> Result<Self, AppError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl ChatLogger for FormLogger {
    async fn log(&self, question: &str, reply: &str) -> Result<(), AppError> {
        let timestamp = Utc::now().to_rfc3339();
        let form = [
            (FIELD_QUESTION, question),
            (FIELD_ANSWER, reply),
            (FIELD_TIMESTAMP, timestamp.as_str()),
        ];

        let request_future = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send();

        let res = timeout(LOG_TIMEOUT, request_future).await??;
        let status = res.status();

        if !status.is_success() {
            return Err(AppError::Collaborator(format!(
                "log submission failed with status {}",
                status
            )));
        }

        debug!("question/answer pair logged");
        Ok(())
    }
}

/// Logger used when no form endpoint is configured.
pub struct NoopLogger;

#[async_trait]
impl ChatLogger for NoopLogger {
    async fn log(&self, _question: &str, _reply: &str) -> Result<(), AppError> {
        Ok(())
    }
}
