//! Nearest-neighbour lookup over stored embeddings.

use tracing::debug;

use scmd_protocols::{CommandRecord, CommandStore, Embedding, StoreError};

/// Records closest to `query` by cosine distance, at most `limit`.
///
/// An empty store or one without embeddings yields an empty list.
pub async fn similar_records(
    store: &dyn CommandStore,
    query: &Embedding,
    limit: usize,
) -> Result<Vec<CommandRecord>, StoreError> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    let hits = store.nearest(query, limit).await?;
    debug!("Vector search returned {} records", hits.len());
    Ok(hits)
}
