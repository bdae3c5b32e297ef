//! Cache-checked data sources.
//!
//! Wrappers that route a source through the process-wide response cache
//! under `<operation>:<argument>` keys. Failures pass through uncached.

use crate::{HistoricalSeries, HistorySource, QuoteRecord, QuoteSource, token_slug};
use async_trait::async_trait;
use pricebot_cache::{CacheKey, SharedResponseCache};
use pricebot_error::{HistoryError, QuoteError};
use std::sync::Arc;
use tracing::instrument;

/// Cache key prefix for quote lookups.
pub const QUOTE_CACHE_PREFIX: &str = "get_crypto_price";

/// Cache key prefix for history lookups.
pub const HISTORY_CACHE_PREFIX: &str = "get_historical_data";

/// Cache key for the quote of `symbol`.
pub fn quote_cache_key(symbol: &str) -> CacheKey {
    CacheKey::new(QUOTE_CACHE_PREFIX, symbol)
}

/// Cache key for `days` days of history of the asset called `name`.
///
/// The day count is part of the key so different windows never alias.
pub fn history_cache_key(name: &str, days: u32) -> CacheKey {
    CacheKey::new(HISTORY_CACHE_PREFIX, format!("{}:{}", token_slug(name), days))
}

/// [`QuoteSource`] that consults the shared cache first.
pub struct CachedQuoteSource {
    inner: Arc<dyn QuoteSource>,
    cache: SharedResponseCache,
}

impl CachedQuoteSource {
    /// Wrap `inner` with `cache`.
    pub fn new(inner: Arc<dyn QuoteSource>, cache: SharedResponseCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl QuoteSource for CachedQuoteSource {
    #[instrument(skip(self))]
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteRecord, QuoteError> {
        let key = quote_cache_key(symbol);
        self.cache
            .get_or_compute(&key, || self.inner.fetch_quote(symbol))
            .await
    }
}

/// [`HistorySource`] that consults the shared cache first.
///
/// Unavailable history is not cached, so a later request tries again.
pub struct CachedHistorySource {
    inner: Arc<dyn HistorySource>,
    cache: SharedResponseCache,
}

impl CachedHistorySource {
    /// Wrap `inner` with `cache`.
    pub fn new(inner: Arc<dyn HistorySource>, cache: SharedResponseCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl HistorySource for CachedHistorySource {
    #[instrument(skip(self))]
    async fn fetch_history(&self, name: &str, days: u32) -> Result<HistoricalSeries, HistoryError> {
        let key = history_cache_key(name, days);
        self.cache
            .get_or_compute(&key, || self.inner.fetch_history(name, days))
            .await
    }
}
