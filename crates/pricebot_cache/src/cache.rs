//! Response cache implementation.

use derive_getters::Getters;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: JsonValue,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl
            .checked_sub(self.created_at.elapsed())
            .filter(|d| !d.is_zero())
    }
}

/// Cache key: the cached operation's name plus its primary argument.
///
/// # Example
///
/// ```
/// use pricebot_cache::CacheKey;
///
/// let key = CacheKey::new("get_crypto_price", "BTC");
/// assert_eq!(key.as_str(), "get_crypto_price:BTC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from an operation prefix and its primary argument.
    pub fn new(prefix: &str, argument: impl fmt::Display) -> Self {
        Self(format!("{}:{}", prefix, argument))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for the response cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct ResponseCacheConfig {
    /// TTL applied to every entry (seconds)
    #[serde(default = "default_ttl")]
    ttl_seconds: u64,

    /// Maximum number of entries
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    300
}

fn default_max_size() -> usize {
    100
}

fn default_enabled() -> bool {
    true
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

impl ResponseCacheConfig {
    /// TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Bounded cache of API responses with a uniform TTL.
///
/// Values are stored as JSON so results of different fetchers can share one
/// cache and one capacity budget. When full, the least recently used entry is
/// evicted. Expired entries are never returned; they are dropped on lookup.
///
/// A compute callback that fails leaves the cache untouched.
///
/// # Example
///
/// ```
/// use pricebot_cache::{CacheKey, ResponseCache, ResponseCacheConfig};
///
/// let mut cache = ResponseCache::new(ResponseCacheConfig::default());
/// let key = CacheKey::new("get_crypto_price", "BTC");
///
/// let first: Result<f64, String> = cache.get_or_compute(&key, || Ok(65000.12));
/// let second: Result<f64, String> = cache.get_or_compute(&key, || Err("not called".into()));
///
/// assert_eq!(first, Ok(65000.12));
/// assert_eq!(second, Ok(65000.12));
/// ```
#[derive(Debug)]
pub struct ResponseCache {
    config: ResponseCacheConfig,
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
    access_order: VecDeque<CacheKey>,
}

impl ResponseCache {
    /// Create a new response cache with configuration.
    pub fn new(config: ResponseCacheConfig) -> Self {
        tracing::debug!(
            ttl_seconds = config.ttl_seconds,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new ResponseCache"
        );
        Self {
            ttl: config.ttl(),
            config,
            entries: HashMap::new(),
            access_order: VecDeque::new(),
        }
    }

    /// Cache configuration.
    pub fn config(&self) -> &ResponseCacheConfig {
        &self.config
    }

    /// Return the live value for `key`, or run `compute` and cache its result.
    ///
    /// `compute` is not invoked on a hit. If it returns an error, nothing is
    /// stored and the error is returned unchanged.
    pub fn get_or_compute<T, E, F>(&mut self, key: &CacheKey, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(hit) = self.get_as(key) {
            return Ok(hit);
        }
        tracing::debug!(key = %key, "Cache miss, computing");
        let value = compute()?;
        self.insert_as(key, &value);
        Ok(value)
    }

    /// Async variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// Holds `&mut self` across the computation; share the cache between
    /// tasks through [`SharedResponseCache`](crate::SharedResponseCache).
    pub async fn get_or_compute_async<T, E, F, Fut>(
        &mut self,
        key: &CacheKey,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get_as(key) {
            return Ok(hit);
        }
        tracing::debug!(key = %key, "Cache miss, computing");
        let value = compute().await?;
        self.insert_as(key, &value);
        Ok(value)
    }

    /// Get a live entry, refreshing its LRU position.
    ///
    /// Returns None if:
    /// - Entry doesn't exist
    /// - Entry is expired (it is removed)
    /// - Cache is disabled
    #[tracing::instrument(skip(self), fields(key = %key, cache_size = self.entries.len()))]
    pub fn get(&mut self, key: &CacheKey) -> Option<&CacheEntry> {
        if !self.config.enabled {
            return None;
        }

        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            self.remove(key);
            return None;
        }

        self.touch(key);

        let entry = self.entries.get(key)?;
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry)
    }

    /// Get a live entry decoded as `T`.
    ///
    /// An entry that no longer decodes as `T` is dropped and reported as a
    /// miss.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &CacheKey) -> Option<T> {
        let value = self.get(key)?.value.clone();
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cached value has unexpected shape, dropping");
                self.remove(key);
                None
            }
        }
    }

    /// Insert a value, evicting the least recently used entry when full.
    #[tracing::instrument(skip(self, value), fields(key = %key, cache_size = self.entries.len()))]
    pub fn insert(&mut self, key: &CacheKey, value: JsonValue) {
        if !self.config.enabled || self.config.max_size == 0 {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(key) {
            self.evict_lru();
        }

        self.touch(key);
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl: self.ttl,
            },
        );

        tracing::debug!(ttl = ?self.ttl, "Inserted entry into cache");
    }

    /// Serialize and insert a value. Returns false if it could not be
    /// serialized (nothing is stored then).
    pub fn insert_as<T: Serialize>(&mut self, key: &CacheKey, value: &T) -> bool {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.insert(key, json);
                true
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Value not serializable, not caching");
                false
            }
        }
    }

    /// Whether `key` has a live entry. Does not affect LRU order.
    pub fn contains_live(&self, key: &CacheKey) -> bool {
        self.config.enabled
            && self
                .entries
                .get(key)
                .is_some_and(|entry| !entry.is_expired())
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired());
        let entries = &self.entries;
        self.access_order.retain(|key| entries.contains_key(key));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.entries.len(),
                "Cleaned up expired cache entries"
            );
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
        self.access_order.push_back(key.clone());
    }

    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
    }

    /// Evict least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.pop_front() {
            tracing::debug!(key = %key, "Evicting LRU entry");
            self.entries.remove(&key);
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(ResponseCacheConfig::default())
    }
}
