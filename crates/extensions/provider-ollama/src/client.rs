//! Ollama HTTP client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use scmd_config::TimeoutConfig;
use scmd_protocols::ProviderError;

use crate::types::*;

/// Ollama API client.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeouts: TimeoutConfig,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, timeouts: TimeoutConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.probe_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeouts,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/tags` answered with a success status within the probe timeout.
    pub async fn is_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.timeouts.probe_secs))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Ollama probe failed: {}", e);
                false
            }
        }
    }

    pub async fn embeddings(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse, ProviderError> {
        debug!("Ollama embeddings: model={}", request.model);
        self.post("/api/embeddings", request, self.timeouts.embed_secs)
            .await
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        debug!("Ollama chat: model={}", request.model);
        self.post("/api/chat", request, self.timeouts.chat_secs).await
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
            .timeout(Duration::from_secs(timeout_secs))
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(e, timeout_secs))?;

        decode(response, timeout_secs).await
    }
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
        let message = serde_json::from_str::<OllamaError>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::DecodeFailed(e.to_string()))
}
