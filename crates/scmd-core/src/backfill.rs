//! Embedding backfill for records stored without a vector.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use scmd_protocols::{CommandStore, ProviderKind, SearchError};

use crate::registry::ProviderRegistry;

/// Progress is logged every this many records.
const PROGRESS_EVERY: usize = 10;

/// Counters of one backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Embeds every record that has no embedding yet.
///
/// Records are independent: a failure is counted and the run moves on, with no
/// retry. While a hosted provider is available the run pauses between records.
pub struct EmbeddingBackfill {
    store: Arc<dyn CommandStore>,
    registry: Arc<ProviderRegistry>,
    delay: Duration,
}

impl EmbeddingBackfill {
    pub fn new(
        store: Arc<dyn CommandStore>,
        registry: Arc<ProviderRegistry>,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            delay,
        }
    }

    pub async fn run(&self) -> Result<BackfillReport, SearchError> {
        if !self.registry.any_available() {
            return Err(SearchError::NoProviderAvailable);
        }

        let pending = self.store.missing_embeddings().await?;
        let mut report = BackfillReport {
            total: pending.len(),
            ..Default::default()
        };
        if pending.is_empty() {
            info!("All commands already have embeddings");
            return Ok(report);
        }
        info!("Generating embeddings for {} commands", report.total);

        let throttle = ProviderKind::PRIORITY
            .iter()
            .any(|kind| kind.is_hosted() && self.registry.is_available(*kind));

        for (i, record) in pending.iter().enumerate() {
            match self.registry.embed_first(&record.embedding_text()).await {
                Some((_, embedding)) => {
                    match self.store.update_embedding(record.id, &embedding).await {
                        Ok(()) => report.succeeded += 1,
                        Err(e) => {
                            warn!("Storing embedding for command {} failed: {}", record.id, e);
                            report.failed += 1;
                        }
                    }
                }
                None => {
                    warn!("No embedding for command {}", record.id);
                    report.failed += 1;
                }
            }

            let done = i + 1;
            if done % PROGRESS_EVERY == 0 {
                info!("Backfill progress: {}/{}", done, report.total);
            }
            if throttle && done < report.total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "Backfill finished: {} succeeded, {} failed",
            report.succeeded, report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "backfill_tests.rs"]
mod tests;
