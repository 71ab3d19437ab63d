//! AI provider trait.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::embedding::Embedding;
use crate::error::ProviderError;
use crate::types::CommandRecord;

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server.
    Ollama,
    /// Hosted Gemini API.
    Gemini,
}

impl ProviderKind {
    /// Fallback order when no provider is preferred.
    pub const PRIORITY: [ProviderKind; 2] = [ProviderKind::Ollama, ProviderKind::Gemini];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Gemini => "gemini",
        }
    }

    /// Hosted providers are rate limited during bulk work.
    pub fn is_hosted(&self) -> bool {
        matches!(self, Self::Gemini)
    }

    /// Position in [`ProviderKind::PRIORITY`].
    pub fn priority(&self) -> usize {
        match self {
            Self::Ollama => 0,
            Self::Gemini => 1,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chat reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatAnswer {
    pub text: String,
    /// Prompt plus completion tokens, 0 when the provider does not report usage.
    pub tokens: u32,
}

impl ChatAnswer {
    pub fn new(text: impl Into<String>, tokens: u32) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }
}

/// An embedding and chat service.
///
/// Adapters must return vectors already normalized to the configured dimension.
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model used for chat.
    fn model(&self) -> &str;

    /// Reachability check with a short timeout. Not cached here; the
    /// registry owns caching.
    async fn probe(&self) -> bool;

    async fn embed(&self, text: &str) -> Result<Embedding, ProviderError>;

    async fn chat(
        &self,
        question: &str,
        context: &[CommandRecord],
    ) -> Result<ChatAnswer, ProviderError>;
}
