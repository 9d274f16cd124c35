//! HTTP translation client.
//!
//! Speaks the LibreTranslate-style request shape: one POST per call with
//! automatic source-language detection. Calls are bounded by a timeout; any
//! failure surfaces as `AppError::Collaborator` or `AppError::Timeout` and
//! is handled by the orchestrator, never by the end user.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::error::AppError;

use super::traits::Translator;

const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Translation collaborator backed by an HTTP endpoint.
pub struct HttpTranslator {
    endpoint: Url,
    client: Client,
}

impl HttpTranslator {
    /// Create a client for the given endpoint URL. An unparseable URL is a
    /// configuration error at startup.
    pub fn new(endpoint: &str) -> Result<Self, AppError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AppError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let payload = serde_json::json!({
            "q": text,
            "source": "auto",
            "target": target_lang,
            "format": "text",
        });

        let request_future = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send();

        let res = timeout(TRANSLATE_TIMEOUT, request_future).await??;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Collaborator(format!(
                "translation request failed with status {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Collaborator(e.to_string()))?;

        let translated = json["translatedText"].as_str().ok_or_else(|| {
            AppError::Collaborator("translation response missing translatedText".to_string())
        })?;

        debug!(target = target_lang, "translation completed");
        Ok(translated.to_string())
    }
}
