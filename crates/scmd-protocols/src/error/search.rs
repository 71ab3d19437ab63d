//! Orchestrator errors surfaced to callers.

use thiserror::Error;

use super::StoreError;
use crate::provider::ProviderKind;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no AI provider available")]
    NoProviderAvailable,

    #[error("preferred AI provider {provider} not available: {reason}")]
    PreferredProviderUnavailable {
        provider: ProviderKind,
        reason: String,
    },

    #[error("all AI providers failed: {0}")]
    ProvidersFailed(String),
}

impl SearchError {
    /// Whether the error came from the store rather than from a provider.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_provider_message() {
        assert_eq!(
            SearchError::NoProviderAvailable.to_string(),
            "no AI provider available"
        );
    }

    #[test]
    fn test_preferred_provider_message() {
        let err = SearchError::PreferredProviderUnavailable {
            provider: ProviderKind::Ollama,
            reason: "connection refused".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("ollama"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = SearchError::from(StoreError::Unavailable("gone".to_string()));
        assert!(err.is_store_error());
        assert_eq!(err.to_string(), "Store unavailable: gone");
    }
}
