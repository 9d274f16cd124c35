//! Term-expansion collaborator.
//!
//! Asks an OpenAI-compatible chat-completions endpoint for German terms
//! related to an unmatched question, so the matcher gets one more chance on
//! loosely phrased input. `NoopExpander` is the default implementation; with
//! it the matcher runs fully offline.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::error::AppError;

use super::traits::TermExpander;

const EXPAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Term expansion backed by a chat-completions endpoint.
pub struct HttpTermExpander {
    endpoint: Url,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpTermExpander {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            model: model.to_string(),
            api_key,
            client: Client::new(),
        })
    }

    fn auth_headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.api_key {
            let value = format!("Bearer {}", key)
                .parse()
                .map_err(|_| AppError::Config("API key is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// The model replies with a comma- or newline-separated term list.
    fn parse_terms(content: &str, max_terms: usize) -> Vec<String> {
        content
            .split(|c| c == ',' || c == '\n' || c == ';')
            .map(|t| t.trim().trim_matches(|c| c == '-' || c == '*' || c == '.').trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .take(max_terms)
            .collect()
    }
}

#[async_trait]
impl TermExpander for HttpTermExpander {
    async fn expand(&self, text: &str, max_terms: usize) -> Result<Vec<String>, AppError> {
        let payload = serde_json::json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                {
                    "role": "system",
                    "content": "Du bist ein Begriffs-Assistent für einen Etikettendruck-Support. Antworte nur mit Begriffen, durch Kommas getrennt."
                },
                {
                    "role": "user",
                    "content": format!(
                        "Nenne bis zu {} verwandte deutsche Begriffe zu: {}",
                        max_terms, text
                    )
                }
            ],
        });

        let request_future = self
            .client
            .post(self.endpoint.clone())
            .headers(self.auth_headers()?)
            .json(&payload)
            .send();

        let res = timeout(EXPAND_TIMEOUT, request_future).await??;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Collaborator(format!(
                "expansion request failed with status {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Collaborator(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("");

        let terms = Self::parse_terms(content, max_terms);
        debug!(count = terms.len(), "term expansion completed");
        Ok(terms)
    }
}

/// Default expander: suggests nothing, keeping the matcher offline.
pub struct NoopExpander;

#[async_trait]
impl TermExpander for NoopExpander {
    async fn expand(&self, _text: &str, _max_terms: usize) -> Result<Vec<String>, AppError> {
        Ok(Vec::new())
    }
}
