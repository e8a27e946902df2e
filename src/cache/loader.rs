//! Async load-through cache with optional single-flight loading

use dashmap::DashMap;
use futures_util::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Boxed loader invoked on a cache miss
pub type Loader<V, E> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<V, E>> + Send + Sync>;

/// How concurrent misses on the same key are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadMode {
    /// Concurrent requesters for an absent key share one loader call
    #[default]
    SingleFlight,
    /// Every concurrent miss calls the loader; the last write wins
    Racy,
}

/// Process-wide key to value memoization over an async loader.
///
/// Values are computed on first request and kept forever. Loader errors
/// propagate unchanged and are not cached.
pub struct AsyncCache<V, E> {
    loader: Loader<V, E>,
    mode: LoadMode,
    entries: DashMap<String, Arc<OnceCell<V>>>,
}

impl<V, E> AsyncCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: 'static,
{
    /// Create a single-flight cache around `loader`
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        Self::with_mode(loader, LoadMode::SingleFlight)
    }

    /// Create a cache with an explicit load mode
    pub fn with_mode<F, Fut>(loader: F, mode: LoadMode) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let loader: Loader<V, E> = Arc::new(move |key| loader(key).boxed());
        Self {
            loader,
            mode,
            entries: DashMap::new(),
        }
    }

    /// Load mode this cache was built with
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Return the value for `key`, calling the loader on a miss
    pub async fn get_item(&self, key: &str) -> Result<V, E> {
        match self.mode {
            LoadMode::SingleFlight => self.get_single_flight(key).await,
            LoadMode::Racy => self.get_racy(key).await,
        }
    }

    /// Resolve every key concurrently, preserving input order.
    ///
    /// Duplicate keys are allowed. If any lookup fails the whole batch
    /// fails; lookups already in flight still run to completion.
    pub async fn get_items<I, K>(&self, keys: I) -> Result<Vec<V>, E>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let lookups = keys.into_iter().map(|key| {
            let key = key.as_ref().to_string();
            async move { self.get_item(&key).await }
        });

        join_all(lookups).await.into_iter().collect()
    }

    /// Whether a value is stored for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.cached(key).is_some()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn get_single_flight(&self, key: &str) -> Result<V, E> {
        let cell = Arc::clone(&self.entries.entry(key.to_string()).or_default());

        if let Some(value) = cell.get() {
            debug!(key, "cache hit");
            return Ok(value.clone());
        }

        let loaded = cell
            .get_or_try_init(|| {
                debug!(key, "cache miss, loading");
                (self.loader)(key.to_string())
            })
            .await
            .cloned();

        if loaded.is_err() {
            self.discard_failed(key, &cell);
        }
        loaded
    }

    /// Drop the empty slot left by a failed load unless another caller is
    /// still waiting on it. Handles are only cloned under the shard lock,
    /// so the count is stable inside `remove_if`.
    fn discard_failed(&self, key: &str, cell: &Arc<OnceCell<V>>) {
        self.entries.remove_if(key, |_, slot| {
            Arc::ptr_eq(slot, cell) && !slot.initialized() && Arc::strong_count(slot) == 2
        });
    }

    async fn get_racy(&self, key: &str) -> Result<V, E> {
        if let Some(value) = self.cached(key) {
            debug!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss, loading");
        let value = (self.loader)(key.to_string()).await?;

        self.entries
            .insert(key.to_string(), Arc::new(OnceCell::from(value.clone())));

        Ok(value)
    }

    fn cached(&self, key: &str) -> Option<V> {
        self.entries.get(key).and_then(|cell| cell.get().cloned())
    }
}

impl<V, E> std::fmt::Debug for AsyncCache<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCache")
            .field("mode", &self.mode)
            .field("keys", &self.entries.len())
            .finish()
    }
}
