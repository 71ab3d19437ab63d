//! # scmd Protocols
//!
//! Types and traits shared by every scmd crate. Contains interface definitions
//! and the small amount of logic that must behave identically on both sides of
//! an interface (dimension normalization, predicate semantics, prompt layout).
//!
//! ## Core Traits
//!
//! - [`CommandStore`] - Persistence of command records and their embeddings
//! - [`AiProvider`] - An embedding and chat service (local or hosted)

pub mod embedding;
pub mod error;
pub mod predicate;
pub mod prompt;
pub mod provider;
pub mod store;
pub mod types;

pub use embedding::Embedding;
pub use error::{ProviderError, SearchError, StoreError};
pub use predicate::KeywordPredicate;
pub use provider::{AiProvider, ChatAnswer, ProviderKind};
pub use store::CommandStore;
pub use types::*;
