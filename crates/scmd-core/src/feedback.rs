//! Writing approved AI answers back into the store.

use std::sync::Arc;

use tracing::{info, warn};

use scmd_protocols::{NewCommand, SearchError, StoreError};

use crate::search::{SearchOutcome, SmartSearch};

/// What the user decided about a displayed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Regenerate,
    Skip,
}

impl ReviewDecision {
    /// `1` approves, `2` asks for a new answer, anything else skips.
    pub fn from_choice(input: &str) -> Self {
        match input.trim() {
            "1" => Self::Approve,
            "2" => Self::Regenerate,
            _ => Self::Skip,
        }
    }
}

/// Description stored alongside an approved answer.
pub fn feedback_description(query: &str) -> String {
    format!("AI-generated response for: {}", query)
}

pub struct FeedbackLoop {
    search: Arc<SmartSearch>,
}

impl FeedbackLoop {
    pub fn new(search: Arc<SmartSearch>) -> Self {
        Self { search }
    }

    /// Persist `answer` as a new record and return its id.
    ///
    /// The id is read as `max(id) + 1` right before the insert, after the
    /// embedding call.
    pub async fn approve(&self, query: &str, answer: &str) -> Result<i64, StoreError> {
        let store = self.search.store();
        let description = feedback_description(query);

        let embedding = self
            .search
            .registry()
            .embed_first(&format!("{} {}", answer, description))
            .await
            .map(|(_, e)| e);
        if embedding.is_none() {
            warn!("Saving approved answer for '{}' without embedding", query);
        }

        let id = store.next_id().await?;
        let id = store
            .insert(
                NewCommand::new(answer, description)
                    .with_id(id)
                    .with_embedding(embedding),
            )
            .await?;
        info!("Saved approved answer as command {}", id);
        Ok(id)
    }

    /// Ask for a fresh answer. Nothing is written.
    pub async fn reject(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        self.search.regenerate(query).await
    }
}

#[cfg(test)]
#[path = "feedback_tests.rs"]
mod tests;
