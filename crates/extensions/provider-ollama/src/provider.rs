//! Ollama provider implementation.

use async_trait::async_trait;

use scmd_config::{OllamaConfig, TimeoutConfig};
use scmd_protocols::prompt::{user_prompt, SYSTEM_INSTRUCTION};
use scmd_protocols::{
    AiProvider, ChatAnswer, CommandRecord, Embedding, ProviderError, ProviderKind,
};

use crate::client::OllamaClient;
use crate::types::*;

/// Ollama provider.
pub struct OllamaProvider {
    client: OllamaClient,
    model: String,
    embedding_model: String,
    dimension: usize,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig, timeouts: &TimeoutConfig, dimension: usize) -> Self {
        Self {
            client: OllamaClient::new(config.base_url(), timeouts.clone()),
            model: config.model.clone(),
            embedding_model: config.embedding_model().to_string(),
            dimension,
        }
    }

    /// Point at an arbitrary server, using `model` for chat and embeddings.
    pub fn with_url(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        let model = model.into();
        Self {
            client: OllamaClient::new(base_url, TimeoutConfig::default()),
            embedding_model: model.clone(),
            model,
            dimension,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn probe(&self) -> bool {
        self.client.is_reachable().await
    }

    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            prompt: text.to_string(),
        };
        let response = self.client.embeddings(&request).await?;
        if response.embedding.is_empty() {
            return Err(ProviderError::DecodeFailed(
                "response contained no embedding".to_string(),
            ));
        }
        Ok(Embedding::normalized(response.embedding, self.dimension))
    }

    async fn chat(
        &self,
        question: &str,
        context: &[CommandRecord],
    ) -> Result<ChatAnswer, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(user_prompt(question, context)),
            ],
            stream: false,
        };
        let response = self.client.chat(&request).await?;
        let tokens = response.total_tokens();
        let text = response
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::DecodeFailed("empty chat response".to_string()))?;
        Ok(ChatAnswer::new(text, tokens))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
