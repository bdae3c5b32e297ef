//! CoinGecko market-chart client for historical prices.

use crate::{HistoricalSeries, HistorySource, PricePoint, token_slug};
use async_trait::async_trait;
use chrono::DateTime;
use pricebot_error::{HistoryError, HistoryErrorKind};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Production API base URL.
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `market_chart` response body. Only the price samples are used.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

/// Decode a `market_chart` body into an ascending series.
///
/// # Errors
///
/// `Parse` if the body is not the expected shape, holds no samples, or holds
/// a timestamp outside chrono's range.
pub fn parse_market_chart(body: &str) -> Result<HistoricalSeries, HistoryError> {
    let response: MarketChartResponse = serde_json::from_str(body)
        .map_err(|e| HistoryError::new(HistoryErrorKind::Parse(e.to_string())))?;

    if response.prices.is_empty() {
        return Err(HistoryError::new(HistoryErrorKind::Parse(
            "no price samples".to_string(),
        )));
    }

    let points = response
        .prices
        .into_iter()
        .map(|(millis, price)| {
            DateTime::from_timestamp_millis(millis as i64)
                .map(|timestamp| PricePoint { timestamp, price })
                .ok_or_else(|| {
                    HistoryError::new(HistoryErrorKind::Parse(format!(
                        "timestamp out of range: {}",
                        millis
                    )))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HistoricalSeries::new(points))
}

/// CoinGecko client implementing [`HistorySource`]. Needs no credentials.
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a client for the public API with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: COINGECKO_API_URL.to_string(),
        }
    }

    /// Point the client at another API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the market chart for the asset called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricebot_market::CoinGeckoClient;
    ///
    /// let client = CoinGeckoClient::new();
    /// assert_eq!(
    ///     client.market_chart_url("Bitcoin Cash"),
    ///     "https://api.coingecko.com/api/v3/coins/bitcoin-cash/market_chart"
    /// );
    /// ```
    pub fn market_chart_url(&self, name: &str) -> String {
        format!("{}/coins/{}/market_chart", self.base_url, token_slug(name))
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistorySource for CoinGeckoClient {
    #[instrument(skip(self))]
    async fn fetch_history(&self, name: &str, days: u32) -> Result<HistoricalSeries, HistoryError> {
        if days == 0 {
            return Err(HistoryError::new(HistoryErrorKind::InvalidRequest(
                "days must be positive".to_string(),
            )));
        }

        let days = days.to_string();
        let response = self
            .client
            .get(self.market_chart_url(name))
            .query(&[("vs_currency", "usd"), ("days", days.as_str())])
            .send()
            .await
            .map_err(|e| HistoryError::new(HistoryErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HistoryError::new(HistoryErrorKind::Status(status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HistoryError::new(HistoryErrorKind::Transport(e.to_string())))?;

        let series = parse_market_chart(&body)?;
        debug!(points = series.len(), "Fetched price history");
        Ok(series)
    }
}
