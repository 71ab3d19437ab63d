//! Provider registry.
//!
//! Holds the configured providers and their availability. Availability is
//! probed by [`ProviderRegistry::refresh`] and cached until the next refresh;
//! a provider that recovers mid-process stays unavailable until then.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use scmd_protocols::{AiProvider, Embedding, ProviderKind};

use crate::error::RegistryError;

/// Registry for the embedding/chat providers.
pub struct ProviderRegistry {
    providers: DashMap<ProviderKind, Arc<dyn AiProvider>>,
    availability: RwLock<HashMap<ProviderKind, bool>>,
}

impl ProviderRegistry {
    /// Create an empty registry. Nothing is available until [`refresh`](Self::refresh).
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
            availability: RwLock::new(HashMap::new()),
        }
    }

    /// Register the providers and probe them once.
    pub async fn initialize(
        providers: Vec<Arc<dyn AiProvider>>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for provider in providers {
            registry.register(provider)?;
        }
        registry.refresh().await;
        Ok(registry)
    }

    /// Register a provider.
    pub fn register(&self, provider: Arc<dyn AiProvider>) -> Result<(), RegistryError> {
        let kind = provider.kind();

        if self.providers.contains_key(&kind) {
            return Err(RegistryError::AlreadyRegistered(kind));
        }

        self.providers.insert(kind, provider);
        Ok(())
    }

    /// Probe every registered provider and replace the cached availability.
    pub async fn refresh(&self) {
        let mut probed = HashMap::new();
        for provider in self.in_priority_order() {
            let kind = provider.kind();
            let available = provider.probe().await;
            if available {
                info!("AI provider {} available (model {})", kind, provider.model());
            } else {
                warn!("AI provider {} not available", kind);
            }
            probed.insert(kind, available);
        }
        *self.availability.write() = probed;
    }

    /// Cached availability; false for unknown or never-probed providers.
    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.availability.read().get(&kind).copied().unwrap_or(false)
    }

    pub fn any_available(&self) -> bool {
        self.availability.read().values().any(|v| *v)
    }

    /// Get a provider by kind.
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn AiProvider>> {
        self.providers.get(&kind).map(|p| p.clone())
    }

    /// Registered providers in fallback order.
    pub fn in_priority_order(&self) -> Vec<Arc<dyn AiProvider>> {
        ProviderKind::PRIORITY
            .iter()
            .filter_map(|kind| self.get(*kind))
            .collect()
    }

    /// Available providers in fallback order.
    pub fn available(&self) -> Vec<Arc<dyn AiProvider>> {
        self.in_priority_order()
            .into_iter()
            .filter(|p| self.is_available(p.kind()))
            .collect()
    }

    /// Embed `text` with the first available provider that succeeds.
    pub async fn embed_first(&self, text: &str) -> Option<(ProviderKind, Embedding)> {
        for provider in self.available() {
            match provider.embed(text).await {
                Ok(embedding) => return Some((provider.kind(), embedding)),
                Err(e) => warn!("Embedding with {} failed: {}", provider.kind(), e),
            }
        }
        debug!("No provider produced an embedding");
        None
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
