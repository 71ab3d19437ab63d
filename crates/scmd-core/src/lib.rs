//! # scmd Core
//!
//! Search and ranking for the command store.
//!
//! A query flows through [`normalizer`] and [`predicate`] into the store, the
//! candidates are ranked by [`scoring`], and [`SmartSearch`] decides whether
//! keyword results are good enough or whether to consult the providers held by
//! the [`ProviderRegistry`] for vector search and a chat answer. Approved
//! answers are written back by the [`FeedbackLoop`].

pub mod backfill;
pub mod catalog;
pub mod error;
pub mod feedback;
pub mod normalizer;
pub mod predicate;
pub mod registry;
pub mod scoring;
pub mod search;
pub mod vector;

#[cfg(test)]
mod testing;

pub use backfill::{BackfillReport, EmbeddingBackfill};
pub use catalog::Catalog;
pub use error::{CatalogError, RegistryError};
pub use feedback::{FeedbackLoop, ReviewDecision};
pub use normalizer::NormalizedQuery;
pub use registry::ProviderRegistry;
pub use search::{SearchOutcome, SmartSearch};
