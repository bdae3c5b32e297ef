//! Task-safe handle to a process-wide response cache.

use crate::{CacheKey, ResponseCache, ResponseCacheConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle to one [`ResponseCache`] shared by concurrent handlers.
///
/// The lock is held only while looking up and while storing, never while the
/// compute future runs, so slow fetches for one key do not block others. Two
/// concurrent misses on the same key may both compute; the later result
/// overwrites the earlier one.
///
/// The bot creates exactly one of these at startup and keeps it for the life
/// of the process.
#[derive(Debug, Clone)]
pub struct SharedResponseCache {
    inner: Arc<Mutex<ResponseCache>>,
}

impl SharedResponseCache {
    /// Create a shared cache with configuration.
    pub fn new(config: ResponseCacheConfig) -> Self {
        Self::from_cache(ResponseCache::new(config))
    }

    /// Wrap an existing cache.
    pub fn from_cache(cache: ResponseCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Return the live value for `key`, or await `compute` and cache its
    /// result. Errors are returned unchanged and never cached.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: &CacheKey, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let hit = self.inner.lock().await.get_as::<T>(key);
        if let Some(value) = hit {
            return Ok(value);
        }

        tracing::debug!(key = %key, "Shared cache miss, computing");
        let value = compute().await?;
        self.inner.lock().await.insert_as(key, &value);
        Ok(value)
    }

    /// Whether `key` has a live entry.
    pub async fn contains_live(&self, key: &CacheKey) -> bool {
        self.inner.lock().await.contains_live(key)
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Drop expired entries, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.lock().await.cleanup_expired()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }
}

impl Default for SharedResponseCache {
    fn default() -> Self {
        Self::new(ResponseCacheConfig::default())
    }
}
