//! Embedding and chat provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    DecodeFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}
