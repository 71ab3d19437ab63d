//! SQLite command store implementation.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::debug;

use scmd_protocols::{
    CommandRecord, CommandStore, Embedding, EmbeddingStats, KeywordPredicate, NewCommand,
    StoreError,
};

use crate::query::{
    build_search_query, encode_embedding, into_record, read_row, RawRow, SELECT_COLUMNS,
};
use crate::schema::init_schema;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// SQLite-based command store.
pub struct SqliteCommandStore {
    conn: Connection,
}

impl SqliteCommandStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::with_connection(conn).await
    }

    /// Open (or create) a file-backed database, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(map_err)?;
        Ok(Self { conn })
    }

    async fn fetch(&self, sql: String, params: Vec<String>) -> Result<Vec<CommandRecord>, StoreError> {
        let rows: Vec<RawRow> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), read_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(map_err)?;
        rows.into_iter().map(into_record).collect()
    }

    async fn scalar(&self, sql: &'static str) -> Result<i64, StoreError> {
        self.conn
            .call(move |conn| Ok(conn.query_row(sql, [], |row| row.get(0))?))
            .await
            .map_err(map_err)
    }
}

/// A closed connection means the store is gone; anything else is a query failure.
fn map_err(e: tokio_rusqlite::Error) -> StoreError {
    match e {
        tokio_rusqlite::Error::ConnectionClosed => {
            StoreError::Unavailable("connection closed".to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

#[async_trait]
impl CommandStore for SqliteCommandStore {
    async fn search(&self, predicate: &KeywordPredicate) -> Result<Vec<CommandRecord>, StoreError> {
        let (sql, params) = build_search_query(predicate);
        let records = self.fetch(sql, params).await?;
        debug!("SQLite keyword search matched {} commands", records.len());
        Ok(records)
    }

    async fn nearest(
        &self,
        query: &Embedding,
        limit: usize,
    ) -> Result<Vec<CommandRecord>, StoreError> {
        let sql = format!("{} WHERE embedding IS NOT NULL ORDER BY id", SELECT_COLUMNS);
        let candidates = self.fetch(sql, Vec::new()).await?;

        let mut ranked: Vec<(f32, CommandRecord)> = candidates
            .into_iter()
            .filter_map(|r| {
                let distance = r.embedding.as_ref()?.cosine_distance(query);
                Some((distance, r))
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(limit);

        Ok(ranked.into_iter().map(|(_, r)| r).collect())
    }

    async fn insert(&self, command: NewCommand) -> Result<i64, StoreError> {
        let blob = command.embedding.as_ref().map(encode_embedding);
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO commands (id, key, data, embedding) VALUES (?1, ?2, ?3, ?4)",
                    params![command.id, command.key, command.data, blob],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_err)
    }

    async fn get(&self, id: i64) -> Result<Option<CommandRecord>, StoreError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row: Option<RawRow> = self
            .conn
            .call(move |conn| Ok(conn.query_row(&sql, [id], read_row).optional()?))
            .await
            .map_err(map_err)?;
        row.map(into_record).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .call(move |conn| Ok(conn.execute("DELETE FROM commands WHERE id = ?1", [id])?))
            .await
            .map_err(map_err)?;
        debug!("Deleted {} command(s) with id {}", deleted, id);
        Ok(deleted > 0)
    }

    async fn update_embedding(&self, id: i64, embedding: &Embedding) -> Result<(), StoreError> {
        let blob = encode_embedding(embedding);
        let updated = self
            .conn
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE commands SET embedding = ?1 WHERE id = ?2",
                    params![blob, id],
                )?)
            })
            .await
            .map_err(map_err)?;

        if updated == 0 {
            return Err(StoreError::Query(format!("no command with id {}", id)));
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let key = key.to_string();
        let found = self
            .conn
            .call(move |conn| {
                Ok(conn
                    .query_row("SELECT 1 FROM commands WHERE key = ?1 LIMIT 1", [&key], |row| {
                        row.get::<_, i64>(0)
                    })
                    .optional()?)
            })
            .await
            .map_err(map_err)?;
        Ok(found.is_some())
    }

    async fn next_id(&self) -> Result<i64, StoreError> {
        self.scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM commands").await
    }

    async fn missing_embeddings(&self) -> Result<Vec<CommandRecord>, StoreError> {
        let sql = format!("{} WHERE embedding IS NULL ORDER BY id", SELECT_COLUMNS);
        self.fetch(sql, Vec::new()).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CommandRecord>, StoreError> {
        let sql = format!("{} ORDER BY id DESC LIMIT {}", SELECT_COLUMNS, limit);
        self.fetch(sql, Vec::new()).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.scalar("SELECT COUNT(*) FROM commands").await? as u64)
    }

    async fn embedding_stats(&self) -> Result<EmbeddingStats, StoreError> {
        let total = self.count().await?;
        let with_embedding = self
            .scalar("SELECT COUNT(*) FROM commands WHERE embedding IS NOT NULL")
            .await? as u64;
        Ok(EmbeddingStats {
            total,
            with_embedding,
        })
    }
}
