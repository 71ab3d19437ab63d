//! Gemini HTTP client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use scmd_config::TimeoutConfig;
use scmd_protocols::ProviderError;

use crate::types::*;

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeouts: TimeoutConfig,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeouts: TimeoutConfig,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.probe_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeouts,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists a single model to confirm the key is accepted.
    pub async fn probe(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        match self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("pageSize", "1")])
            .timeout(Duration::from_secs(self.timeouts.probe_secs))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Gemini probe failed: {}", e);
                false
            }
        }
    }

    pub async fn embed_content(
        &self,
        model: &str,
        request: &EmbedContentRequest,
    ) -> Result<EmbedContentResponse, ProviderError> {
        debug!("Gemini embedContent: model={}", model);
        let path = format!("/models/{}:embedContent", model_id(model));
        self.post(&path, request, self.timeouts.embed_secs).await
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        debug!("Gemini generateContent: model={}", model);
        let path = format!("/models/{}:generateContent", model_id(model));
        self.post(&path, request, self.timeouts.chat_secs).await
    }

    async fn post<B, T>(&self, path: &str, body: &B, timeout_secs: u64) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(Duration::from_secs(timeout_secs))
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(e, timeout_secs))?;

        decode(response, timeout_secs).await
    }
}

/// Model names may arrive as `models/embedding-001`.
pub(crate) fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

fn request_error(e: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else if e.is_connect() {
        ProviderError::Unavailable(e.to_string())
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: Response, timeout_secs: u64) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| request_error(e, timeout_secs))?;

    if !status.is_success() {
        let message = serde_json::from_str::<GeminiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::DecodeFailed(e.to_string()))
}
