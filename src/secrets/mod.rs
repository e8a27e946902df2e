//! Secret access backed by Key Vault
//!
//! `SecretProvider` answers existence checks straight from the store and
//! serves secret values through the process-wide [`AsyncCache`].

pub mod key_vault;

pub use key_vault::KeyVaultCli;

use crate::cache::{AsyncCache, LoadMode};
use crate::error::{HeroError, HeroResult};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Remote secret store
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the current value of a secret.
    ///
    /// Returns `HeroError::SecretNotFound` when the store has no such secret.
    async fn get_secret(&self, name: &str) -> HeroResult<String>;

    /// Human-readable store name for logs
    fn store_name(&self) -> &str;
}

/// Cached secret lookups over a [`SecretStore`]
pub struct SecretProvider {
    store: Arc<dyn SecretStore>,
    cache: AsyncCache<String, HeroError>,
}

impl SecretProvider {
    /// Create a provider whose cache uses `mode` for concurrent misses
    pub fn new(store: Arc<dyn SecretStore>, mode: LoadMode) -> Self {
        let loader_store = Arc::clone(&store);
        let cache = AsyncCache::with_mode(
            move |name: String| {
                let store = Arc::clone(&loader_store);
                async move { store.get_secret(&name).await }
            },
            mode,
        );

        Self { store, cache }
    }

    /// Check whether a secret exists, bypassing the cache
    pub async fn secret_exists(&self, name: &str) -> HeroResult<bool> {
        match self.store.get_secret(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!("Secret {} missing from {}", name, self.store.store_name());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Check several secrets concurrently; flags follow input order
    pub async fn secrets_exist<I, S>(&self, names: I) -> HeroResult<Vec<bool>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let checks = names.into_iter().map(|name| {
            let name = name.as_ref().to_string();
            async move { self.secret_exists(&name).await }
        });

        join_all(checks).await.into_iter().collect()
    }

    /// Get a secret value, loading it from the store at most once
    pub async fn get_secret(&self, name: &str) -> HeroResult<String> {
        self.cache.get_item(name).await
    }

    /// Get several secret values; values follow input order
    pub async fn get_secrets<I, S>(&self, names: I) -> HeroResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cache.get_items(names).await
    }

    /// Number of secret values held in memory
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn store_name(&self) -> &str {
        self.store.store_name()
    }
}
