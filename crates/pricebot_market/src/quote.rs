//! Quote record produced by the quote fetcher.

use crate::FiatCurrency;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percent price changes over the standard windows, in the canonical currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct PercentChanges {
    /// Change over the last hour
    hour: f64,
    /// Change over the last 24 hours
    day: f64,
    /// Change over the last 30 days
    month: f64,
}

impl PercentChanges {
    /// Labels for the windows, in the order of [`as_array`](Self::as_array).
    pub const LABELS: [&'static str; 3] = ["1h", "24h", "30d"];

    /// Create from the 1h, 24h and 30d values.
    pub fn new(hour: f64, day: f64, month: f64) -> Self {
        Self { hour, day, month }
    }

    /// Values as `[1h, 24h, 30d]`.
    pub fn as_array(&self) -> [f64; 3] {
        [self.hour, self.day, self.month]
    }

    /// `(label, value)` pairs in display order.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::LABELS.into_iter().zip(self.as_array())
    }
}

impl From<[f64; 3]> for PercentChanges {
    fn from([hour, day, month]: [f64; 3]) -> Self {
        Self::new(hour, day, month)
    }
}

/// Format a price with 2 decimals, or 6 when it is below 1.
///
/// # Examples
///
/// ```
/// use pricebot_market::format_price;
///
/// assert_eq!(format_price(65000.123), "65000.12");
/// assert_eq!(format_price(0.0001234), "0.000123");
/// ```
pub fn format_price(price: f64) -> String {
    if price < 1.0 {
        format!("{:.6}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// Latest prices for one asset in every supported currency.
///
/// Immutable once built; a fresh record is produced on every cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct QuoteRecord {
    /// Ticker, uppercase (e.g. "BTC")
    symbol: String,
    /// Human-readable asset name (e.g. "Bitcoin")
    name: String,
    /// Price per currency, iterated in `FiatCurrency` order
    prices: BTreeMap<FiatCurrency, f64>,
    /// 1h/24h/30d changes in the canonical currency
    changes: PercentChanges,
}

impl QuoteRecord {
    /// Assemble a record.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        prices: BTreeMap<FiatCurrency, f64>,
        changes: PercentChanges,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            prices,
            changes,
        }
    }

    /// Price in one currency, if it was fetched.
    pub fn price_in(&self, currency: FiatCurrency) -> Option<f64> {
        self.prices.get(&currency).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc() -> QuoteRecord {
        let prices = BTreeMap::from([
            (FiatCurrency::Gbp, 52000.0),
            (FiatCurrency::Usd, 65000.12),
            (FiatCurrency::Eur, 60000.0),
        ]);
        QuoteRecord::new("BTC", "Bitcoin", prices, [0.5, -1.2, 10.3].into())
    }

    #[test]
    fn test_format_price_precision_switches_at_one() {
        assert_eq!(format_price(1.0), "1.00");
        assert_eq!(format_price(0.999999), "0.999999");
        assert_eq!(format_price(0.0), "0.000000");
    }

    #[test]
    fn test_prices_iterate_in_currency_order() {
        let record = btc();
        let order: Vec<_> = record.prices().keys().copied().collect();
        assert_eq!(order, FiatCurrency::ALL);
        assert_eq!(record.price_in(FiatCurrency::Usd), Some(65000.12));
    }

    #[test]
    fn test_labelled_changes() {
        let labelled: Vec<_> = btc().changes().labelled().collect();
        assert_eq!(labelled, vec![("1h", 0.5), ("24h", -1.2), ("30d", 10.3)]);
    }

    #[test]
    fn test_survives_cache_serialization() {
        let record = btc();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["prices"]["EUR"], 60000.0);
        let back: QuoteRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
