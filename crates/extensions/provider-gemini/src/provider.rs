//! Gemini provider implementation.

use async_trait::async_trait;
use tracing::debug;

use scmd_config::{GeminiConfig, TimeoutConfig};
use scmd_protocols::prompt::{user_prompt, SYSTEM_INSTRUCTION};
use scmd_protocols::{
    AiProvider, ChatAnswer, CommandRecord, Embedding, ProviderError, ProviderKind,
};

use crate::client::{model_id, GeminiClient};
use crate::types::*;

/// Gemini provider. Without an API key it never reports available.
pub struct GeminiProvider {
    client: Option<GeminiClient>,
    model: String,
    embedding_model: String,
    dimension: usize,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig, timeouts: &TimeoutConfig, dimension: usize) -> Self {
        let client = config
            .api_key
            .as_deref()
            .filter(|_| config.has_api_key())
            .map(|key| GeminiClient::new(key.trim(), config.base_url.clone(), timeouts.clone()));
        Self {
            client,
            model: config.model.clone(),
            embedding_model: config.embedding_model.clone(),
            dimension,
        }
    }

    pub fn with_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        embedding_model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client: Some(GeminiClient::new(api_key, base_url, TimeoutConfig::default())),
            model: model.into(),
            embedding_model: embedding_model.into(),
            dimension,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&GeminiClient, ProviderError> {
        self.client
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("GEMINIAPI is not set".to_string()))
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn probe(&self) -> bool {
        match &self.client {
            Some(client) => client.probe().await,
            None => {
                debug!("Gemini probe skipped: no API key");
                false
            }
        }
    }

    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        let client = self.client()?;
        let request = EmbedContentRequest {
            model: format!("models/{}", model_id(&self.embedding_model)),
            content: Content::text(None, text),
        };
        let response = client.embed_content(&self.embedding_model, &request).await?;
        let values = response
            .embedding
            .map(|e| e.values)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ProviderError::DecodeFailed("response contained no embedding".to_string())
            })?;
        Ok(Embedding::normalized(values, self.dimension))
    }

    async fn chat(
        &self,
        question: &str,
        context: &[CommandRecord],
    ) -> Result<ChatAnswer, ProviderError> {
        let client = self.client()?;
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), user_prompt(question, context))],
            system_instruction: Some(Content::text(None, SYSTEM_INSTRUCTION)),
        };
        let response = client.generate_content(&self.model, &request).await?;
        let tokens = response
            .usage_metadata
            .as_ref()
            .map(|u| u.total_token_count)
            .unwrap_or(0);
        let text = response
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderError::DecodeFailed("empty chat response".to_string()))?;
        Ok(ChatAnswer::new(text, tokens))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
