//! # scmd Ollama Provider
//!
//! Embeddings and chat from a local Ollama server.

mod client;
mod provider;
mod types;

pub use client::OllamaClient;
pub use provider::OllamaProvider;
