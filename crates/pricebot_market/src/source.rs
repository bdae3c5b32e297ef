//! Data source traits.
//!
//! The dispatcher talks to quote and history providers only through these
//! traits, so the HTTP clients, their cached wrappers and test doubles are
//! interchangeable.

use crate::{HistoricalSeries, QuoteRecord};
use async_trait::async_trait;
use pricebot_error::{HistoryError, QuoteError};

/// Provides latest prices for an asset symbol.
///
/// # Tracing
///
/// Implementations should instrument `fetch_quote` with the symbol as a span
/// field and never log credentials.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch prices in every supported currency plus 1h/24h/30d changes.
    ///
    /// Fails as a whole if any per-currency lookup fails.
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteRecord, QuoteError>;
}

/// Provides historical USD prices for an asset.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch `days` days of history for the asset called `name`.
    ///
    /// An error here means "history unavailable", never a fatal condition.
    async fn fetch_history(&self, name: &str, days: u32) -> Result<HistoricalSeries, HistoryError>;

    /// [`fetch_history`](Self::fetch_history), with unavailability logged and
    /// collapsed to `None`.
    async fn history_or_unavailable(&self, name: &str, days: u32) -> Option<HistoricalSeries> {
        match self.fetch_history(name, days).await {
            Ok(series) => Some(series),
            Err(e) => {
                tracing::warn!(name, days, error = %e.kind(), "Historical data unavailable");
                None
            }
        }
    }
}
