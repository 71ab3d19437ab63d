//! # scmd SQLite Store
//!
//! [`CommandStore`](scmd_protocols::CommandStore) backed by a single SQLite
//! table. Embeddings are stored as little-endian `f32` blobs and ranked by
//! cosine distance in process.

mod query;
mod schema;
mod store;

pub use store::SqliteCommandStore;
