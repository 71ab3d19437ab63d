//! Wiring of the store, providers and services from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use scmd_config::{Config, ConfigLoader};
use scmd_core::{Catalog, EmbeddingBackfill, FeedbackLoop, ProviderRegistry, SmartSearch};
use scmd_protocols::{AiProvider, CommandStore};
use scmd_provider_gemini::GeminiProvider;
use scmd_provider_ollama::OllamaProvider;
use scmd_store_sqlite::SqliteCommandStore;

/// Everything a command handler needs, built once per process.
pub(crate) struct App {
    pub config: Config,
    pub registry: Arc<ProviderRegistry>,
    pub search: Arc<SmartSearch>,
    pub catalog: Catalog,
}

impl App {
    pub(crate) async fn bootstrap(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db_path = ConfigLoader::expand_path(&config.store.path);
        debug!("Opening command store at {}", db_path.display());
        let store: Arc<dyn CommandStore> = Arc::new(SqliteCommandStore::open(&db_path).await?);

        let registry = Arc::new(ProviderRegistry::initialize(build_providers(&config)).await?);
        for provider in registry.in_priority_order() {
            info!(
                "Provider {} ({}): {}",
                provider.kind(),
                provider.model(),
                if registry.is_available(provider.kind()) {
                    "available"
                } else {
                    "unavailable"
                }
            );
        }

        let search = Arc::new(SmartSearch::new(
            store.clone(),
            registry.clone(),
            config.search.clone(),
            config.agent,
        ));
        let catalog = Catalog::new(store, registry.clone());

        Ok(Self {
            config,
            registry,
            search,
            catalog,
        })
    }

    pub(crate) fn feedback(&self) -> FeedbackLoop {
        FeedbackLoop::new(self.search.clone())
    }

    pub(crate) fn backfill(&self) -> EmbeddingBackfill {
        EmbeddingBackfill::new(
            self.search.store().clone(),
            self.registry.clone(),
            Duration::from_millis(self.config.embedding.backfill_delay_ms),
        )
    }
}

fn build_providers(config: &Config) -> Vec<Arc<dyn AiProvider>> {
    let dimension = config.embedding.dimension;
    vec![
        Arc::new(OllamaProvider::new(&config.ollama, &config.timeouts, dimension)),
        Arc::new(GeminiProvider::new(&config.gemini, &config.timeouts, dimension)),
    ]
}
