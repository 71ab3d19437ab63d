//! Adding, importing and listing commands.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use scmd_protocols::{CommandRecord, CommandStore, EmbeddingStats, NewCommand};

use crate::error::CatalogError;
use crate::registry::ProviderRegistry;

/// Write-side operations on the command store.
pub struct Catalog {
    store: Arc<dyn CommandStore>,
    registry: Arc<ProviderRegistry>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CommandStore>, registry: Arc<ProviderRegistry>) -> Self {
        Self { store, registry }
    }

    /// Add a command, embedding it when a provider is available.
    pub async fn add(&self, key: &str, data: &str) -> Result<i64, CatalogError> {
        if self.store.exists(key).await? {
            return Err(CatalogError::Duplicate(key.to_string()));
        }

        let embedding = match self.registry.embed_first(&format!("{} {}", key, data)).await {
            Some((kind, embedding)) => {
                debug!("Embedded new command with {}", kind);
                Some(embedding)
            }
            None => None,
        };
        let embedded = embedding.is_some();

        let id = self
            .store
            .insert(NewCommand::new(key, data).with_embedding(embedding))
            .await?;
        info!("Added command {} (embedding: {})", id, embedded);
        Ok(id)
    }

    /// Add a command whose description may still carry Markdown code fences.
    pub async fn save(&self, key: &str, data: &str) -> Result<i64, CatalogError> {
        self.add(key.trim(), &strip_code_fences(data)).await
    }

    /// Import a Markdown file as one command: the title becomes the key and the
    /// whole document the description.
    pub async fn import_markdown(&self, path: &Path) -> Result<i64, CatalogError> {
        let is_markdown = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if !is_markdown {
            return Err(CatalogError::InvalidDocument {
                path: path.to_path_buf(),
                reason: "not a .md file".to_string(),
            });
        }

        let content = tokio::fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Err(CatalogError::InvalidDocument {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }

        let title = markdown_title(&content, path);
        self.add(&title, &content).await
    }

    pub async fn show(&self, id: i64) -> Result<CommandRecord, CatalogError> {
        self.store.get(id).await?.ok_or(CatalogError::NotFound(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        if !self.store.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        info!("Deleted command {}", id);
        Ok(())
    }

    /// The newest `limit` commands.
    pub async fn recent(&self, limit: usize) -> Result<Vec<CommandRecord>, CatalogError> {
        Ok(self.store.recent(limit).await?)
    }

    pub async fn count(&self) -> Result<u64, CatalogError> {
        Ok(self.store.count().await?)
    }

    pub async fn embedding_stats(&self) -> Result<EmbeddingStats, CatalogError> {
        Ok(self.store.embedding_stats().await?)
    }
}

/// Drop lines that open or close a fenced code block and trim the rest.
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// First `# ` heading, falling back to the file stem.
pub fn markdown_title(content: &str, path: &Path) -> String {
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
