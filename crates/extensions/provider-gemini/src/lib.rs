//! # scmd Gemini Provider
//!
//! Embeddings and chat from the hosted Gemini API.

mod client;
mod provider;
mod types;

pub use client::GeminiClient;
pub use provider::GeminiProvider;
