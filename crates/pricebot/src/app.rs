//! Service wiring.

use crate::{Credentials, PricebotConfig};
use pricebot_cache::SharedResponseCache;
use pricebot_chart::{ChartRenderer, ImageHost, ImgurClient};
use pricebot_market::{
    CachedHistorySource, CachedQuoteSource, CoinGeckoClient, CoinMarketCapClient, HistorySource,
    QuoteSource,
};
use pricebot_social::CommandDispatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// The dispatcher and the cache behind its sources.
pub struct Services {
    /// Process-wide response cache
    pub cache: SharedResponseCache,
    /// Command dispatcher over the cached sources
    pub dispatcher: Arc<CommandDispatcher>,
}

impl Services {
    /// Wire the live CoinMarketCap, CoinGecko and Imgur clients.
    pub fn from_config(config: &PricebotConfig, credentials: &Credentials) -> Self {
        let http = config.http();
        let quotes = Arc::new(CoinMarketCapClient::with_timeout(
            credentials.cmc_api_key().clone(),
            http.timeout(),
        ));
        let history = Arc::new(CoinGeckoClient::with_timeout(http.timeout()));
        let host = Arc::new(ImgurClient::with_timeout(
            credentials.imgur_client_id().clone(),
            http.upload_timeout(),
        ));
        Self::with_sources(config, quotes, history, host)
    }

    /// Wire arbitrary sources behind one shared cache.
    pub fn with_sources(
        config: &PricebotConfig,
        quotes: Arc<dyn QuoteSource>,
        history: Arc<dyn HistorySource>,
        host: Arc<dyn ImageHost>,
    ) -> Self {
        let cache = SharedResponseCache::new(config.cache().clone());
        let quotes = Arc::new(CachedQuoteSource::new(quotes, cache.clone()));
        let history = Arc::new(CachedHistorySource::new(history, cache.clone()));
        let charts = ChartRenderer::new(host, config.chart().clone());

        info!(
            ttl_seconds = config.cache().ttl_seconds(),
            max_size = config.cache().max_size(),
            prefix = %config.command().prefix(),
            "Services ready"
        );

        let dispatcher = CommandDispatcher::new(quotes, history, charts)
            .with_settings(config.command().clone());
        Self {
            cache,
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Periodically drop expired cache entries so idle keys do not linger.
pub fn spawn_cache_sweeper(cache: SharedResponseCache, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // First tick fires immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                debug!(removed, "Swept expired cache entries");
            }
        }
    })
}
