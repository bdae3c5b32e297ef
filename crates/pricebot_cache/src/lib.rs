//! Time-bounded response caching for outbound API calls.
//!
//! Every entry lives for the same TTL and the cache holds at most a fixed
//! number of entries, evicting the least recently used one when full.
//! Failed computations are never cached.

#![warn(missing_docs)]

mod cache;
mod shared;

pub use cache::{CacheEntry, CacheKey, ResponseCache, ResponseCacheConfig, ResponseCacheConfigBuilder};
pub use shared::SharedResponseCache;
