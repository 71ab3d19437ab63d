//! Command store trait.

use async_trait::async_trait;

use crate::embedding::Embedding;
use crate::error::StoreError;
use crate::predicate::KeywordPredicate;
use crate::types::{CommandRecord, EmbeddingStats, NewCommand};

/// Persistence for command records.
///
/// Uniqueness of `key` is checked by callers through [`CommandStore::exists`];
/// the store itself does not enforce it.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// All records matching the predicate, ordered by id.
    async fn search(&self, predicate: &KeywordPredicate) -> Result<Vec<CommandRecord>, StoreError>;

    /// Embedded records ordered by ascending cosine distance to `query`,
    /// at most `limit` of them.
    async fn nearest(
        &self,
        query: &Embedding,
        limit: usize,
    ) -> Result<Vec<CommandRecord>, StoreError>;

    /// Insert a record and return its id.
    async fn insert(&self, command: NewCommand) -> Result<i64, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<CommandRecord>, StoreError>;

    /// Remove a record; false when no record had that id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn update_embedding(&self, id: i64, embedding: &Embedding) -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// `max(id) + 1`, or 1 for an empty store.
    async fn next_id(&self) -> Result<i64, StoreError>;

    /// Records without an embedding, ordered by id.
    async fn missing_embeddings(&self) -> Result<Vec<CommandRecord>, StoreError>;

    /// The newest `limit` records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<CommandRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    async fn embedding_stats(&self) -> Result<EmbeddingStats, StoreError>;
}
