//! CoinMarketCap latest-quotes client.
//!
//! One request is made per supported fiat currency (the basic API plan only
//! allows a single `convert` target per call). The asset name and the
//! percent changes come from the canonical-currency response.

use crate::{FiatCurrency, PercentChanges, QuoteRecord, QuoteSource};
use async_trait::async_trait;
use pricebot_error::{HttpError, QuoteError, QuoteErrorKind};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument};

/// Production endpoint for latest quotes.
pub const COINMARKETCAP_QUOTES_URL: &str =
    "https://pro-api.coinmarketcap.com/v1/cryptocurrency/quotes/latest";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `quotes/latest` response body.
#[derive(Debug, Deserialize)]
struct QuotesLatestResponse {
    #[serde(default)]
    data: Option<HashMap<String, CmcAsset>>,
}

#[derive(Debug, Deserialize)]
struct CmcAsset {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    quote: HashMap<String, CmcQuote>,
}

#[derive(Debug, Deserialize)]
struct CmcQuote {
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    percent_change_1h: Option<f64>,
    #[serde(default)]
    percent_change_24h: Option<f64>,
    #[serde(default)]
    percent_change_30d: Option<f64>,
}

/// The parts of one per-currency response the record is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyQuote {
    /// Asset name as reported by the API
    pub name: String,
    /// Price in the requested currency
    pub price: f64,
    /// 1h/24h/30d changes, present when all three were reported
    pub changes: Option<PercentChanges>,
}

fn malformed(message: impl Into<String>) -> QuoteError {
    QuoteError::new(QuoteErrorKind::MalformedResponse(message.into()))
}

/// Validate and decode one `quotes/latest` body for `symbol` in `currency`.
///
/// # Errors
///
/// - `MalformedResponse` if the body is not JSON, lacks `data`, or lacks the
///   name or price
/// - `UnknownSymbol` if `data` has no entry for `symbol`
pub fn parse_quote_body(
    symbol: &str,
    currency: FiatCurrency,
    body: &str,
) -> Result<CurrencyQuote, QuoteError> {
    let response: QuotesLatestResponse = serde_json::from_str(body)
        .map_err(|e| malformed(format!("Unreadable response from the price API: {}", e)))?;

    let data = response.data.ok_or_else(|| {
        malformed("No data returned while retrieving the price data from the CoinMarketCap API")
    })?;

    let asset = data
        .get(symbol)
        .ok_or_else(|| QuoteError::new(QuoteErrorKind::UnknownSymbol(symbol.to_string())))?;

    let name = asset
        .name
        .clone()
        .ok_or_else(|| malformed(format!("The price API returned no name for {}", symbol)))?;

    let quote = asset.quote.get(currency.code()).ok_or_else(|| {
        malformed(format!(
            "The price API returned no {} quote for {}",
            currency, symbol
        ))
    })?;

    let price = quote.price.ok_or_else(|| {
        malformed(format!(
            "The price API returned no {} price for {}",
            currency, symbol
        ))
    })?;

    let changes = match (
        quote.percent_change_1h,
        quote.percent_change_24h,
        quote.percent_change_30d,
    ) {
        (Some(hour), Some(day), Some(month)) => Some(PercentChanges::new(hour, day, month)),
        _ => None,
    };

    Ok(CurrencyQuote {
        name,
        price,
        changes,
    })
}

/// Combine per-currency responses into one record.
///
/// `quotes` must hold one entry per currency in `FiatCurrency::ALL` order.
///
/// # Errors
///
/// `MalformedResponse` if the canonical currency is missing or lacks any of
/// the percent changes.
pub fn assemble_quote(
    symbol: &str,
    quotes: Vec<(FiatCurrency, CurrencyQuote)>,
) -> Result<QuoteRecord, QuoteError> {
    let canonical = quotes
        .iter()
        .find(|(currency, _)| *currency == FiatCurrency::CANONICAL)
        .map(|(_, quote)| quote)
        .ok_or_else(|| {
            malformed(format!(
                "The price API returned no {} quote for {}",
                FiatCurrency::CANONICAL,
                symbol
            ))
        })?;

    let changes = canonical.changes.ok_or_else(|| {
        malformed(format!(
            "The price API returned incomplete percent changes for {}",
            symbol
        ))
    })?;
    let name = canonical.name.clone();

    let prices: BTreeMap<FiatCurrency, f64> = quotes
        .into_iter()
        .map(|(currency, quote)| (currency, quote.price))
        .collect();

    Ok(QuoteRecord::new(symbol, name, prices, changes))
}

/// CoinMarketCap client implementing [`QuoteSource`].
///
/// # Example
///
/// ```ignore
/// use pricebot_market::{CoinMarketCapClient, QuoteSource};
///
/// let client = CoinMarketCapClient::new("your_api_key".to_string());
/// let record = client.fetch_quote("BTC").await?;
/// ```
pub struct CoinMarketCapClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl CoinMarketCapClient {
    /// Create a client for the production endpoint with the default timeout.
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client, api_key)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            endpoint: COINMARKETCAP_QUOTES_URL.to_string(),
        }
    }

    /// Point the client at another endpoint (e.g. the sandbox API).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_currency(
        &self,
        symbol: &str,
        currency: FiatCurrency,
    ) -> Result<CurrencyQuote, QuoteError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accepts", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("symbol", symbol), ("convert", currency.code())])
            .send()
            .await
            .map_err(HttpError::from)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Quote API responded");
        if !status.is_success() {
            return Err(QuoteError::new(QuoteErrorKind::from_status(status.as_u16())));
        }

        let body = response.text().await.map_err(HttpError::from)?;
        parse_quote_body(symbol, currency, &body)
    }
}

#[async_trait]
impl QuoteSource for CoinMarketCapClient {
    #[instrument(skip(self), fields(currencies = FiatCurrency::ALL.len()))]
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteRecord, QuoteError> {
        if symbol.trim().is_empty() {
            return Err(QuoteError::new(QuoteErrorKind::InvalidSymbol));
        }

        let mut quotes = Vec::with_capacity(FiatCurrency::ALL.len());
        for currency in FiatCurrency::ALL {
            let quote = self.fetch_currency(symbol, currency).await?;
            quotes.push((currency, quote));
        }

        let record = assemble_quote(symbol, quotes)?;
        debug!(name = %record.name(), "Assembled quote record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(symbol: &str, currency: &str, price: f64) -> String {
        format!(
            r#"{{
                "status": {{ "error_code": 0, "error_message": null }},
                "data": {{
                    "{symbol}": {{
                        "id": 1,
                        "name": "Bitcoin",
                        "symbol": "{symbol}",
                        "quote": {{
                            "{currency}": {{
                                "price": {price},
                                "percent_change_1h": 0.5,
                                "percent_change_24h": -1.2,
                                "percent_change_30d": 10.3
                            }}
                        }}
                    }}
                }}
            }}"#
        )
    }

    #[test]
    fn test_parse_valid_body() {
        let quote = parse_quote_body("BTC", FiatCurrency::Usd, &body("BTC", "USD", 65000.12))
            .expect("valid body");
        assert_eq!(quote.name, "Bitcoin");
        assert_eq!(quote.price, 65000.12);
        assert_eq!(quote.changes, Some(PercentChanges::new(0.5, -1.2, 10.3)));
    }

    #[test]
    fn test_missing_data_is_malformed() {
        let err = parse_quote_body("BTC", FiatCurrency::Usd, r#"{"status": {}}"#).unwrap_err();
        assert_eq!(
            err.reply_text(),
            "No data returned while retrieving the price data from the CoinMarketCap API"
        );
    }

    #[test]
    fn test_unknown_symbol() {
        let err = parse_quote_body("NOPE", FiatCurrency::Usd, &body("BTC", "USD", 1.0)).unwrap_err();
        assert_eq!(err.kind, QuoteErrorKind::UnknownSymbol("NOPE".to_string()));
    }

    #[test]
    fn test_missing_currency_quote_is_malformed() {
        let err = parse_quote_body("BTC", FiatCurrency::Gbp, &body("BTC", "USD", 1.0)).unwrap_err();
        assert!(matches!(err.kind, QuoteErrorKind::MalformedResponse(_)));
    }

    #[test]
    fn test_null_price_is_malformed() {
        let raw = r#"{"data": {"BTC": {"name": "Bitcoin", "quote": {"USD": {"price": null}}}}}"#;
        let err = parse_quote_body("BTC", FiatCurrency::Usd, raw).unwrap_err();
        assert!(matches!(err.kind, QuoteErrorKind::MalformedResponse(_)));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = parse_quote_body("BTC", FiatCurrency::Usd, "<html>").unwrap_err();
        assert!(matches!(err.kind, QuoteErrorKind::MalformedResponse(_)));
    }

    #[test]
    fn test_assemble_uses_canonical_changes() {
        let usd = CurrencyQuote {
            name: "Bitcoin".into(),
            price: 65000.12,
            changes: Some(PercentChanges::new(0.5, -1.2, 10.3)),
        };
        let eur = CurrencyQuote {
            name: "Bitcoin".into(),
            price: 60000.0,
            changes: Some(PercentChanges::new(9.0, 9.0, 9.0)),
        };
        let record = assemble_quote("BTC", vec![(FiatCurrency::Usd, usd), (FiatCurrency::Eur, eur)])
            .expect("assembles");
        assert_eq!(record.changes().as_array(), [0.5, -1.2, 10.3]);
        assert_eq!(record.price_in(FiatCurrency::Eur), Some(60000.0));
    }

    #[test]
    fn test_assemble_requires_changes() {
        let usd = CurrencyQuote {
            name: "NewCoin".into(),
            price: 0.01,
            changes: None,
        };
        let err = assemble_quote("NEW", vec![(FiatCurrency::Usd, usd)]).unwrap_err();
        assert!(matches!(err.kind, QuoteErrorKind::MalformedResponse(_)));
    }
}
