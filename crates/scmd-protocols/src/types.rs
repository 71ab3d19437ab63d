//! Record types shared between the store, the scorer and the CLI.

use serde::Serialize;

use crate::embedding::Embedding;

/// A stored command. `key` holds the command body, `data` its description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRecord {
    pub id: i64,
    pub key: String,
    pub data: String,
    #[serde(skip)]
    pub embedding: Option<Embedding>,
}

impl CommandRecord {
    pub fn new(id: i64, key: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            data: data.into(),
            embedding: None,
        }
    }

    pub fn with_embedding(mut self, embedding: Embedding) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Text used for embedding a record: the command followed by its description.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.key, self.data)
    }
}

/// A record waiting to be inserted.
///
/// `id` is left empty to let the store assign one; the feedback loop supplies
/// an explicit id.
#[derive(Debug, Clone, Default)]
pub struct NewCommand {
    pub id: Option<i64>,
    pub key: String,
    pub data: String,
    pub embedding: Option<Embedding>,
}

impl NewCommand {
    pub fn new(key: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: None,
            key: key.into(),
            data: data.into(),
            embedding: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_embedding(mut self, embedding: Option<Embedding>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// Relevance of one record against a keyword set. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandScore {
    pub record: CommandRecord,
    /// `match_count * 100 / total_words`, or 0 without keywords.
    pub score: u32,
    pub match_count: usize,
    pub total_words: usize,
}

/// Embedding coverage of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EmbeddingStats {
    pub total: u64,
    pub with_embedding: u64,
}

impl EmbeddingStats {
    pub fn without_embedding(&self) -> u64 {
        self.total.saturating_sub(self.with_embedding)
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.with_embedding as f64 * 100.0 / self.total as f64
    }
}
