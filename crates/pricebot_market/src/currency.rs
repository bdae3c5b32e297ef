//! Supported fiat quote currencies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fiat currencies prices are quoted in.
///
/// Declaration order is the iteration and display order; `Usd` comes first
/// and is the canonical currency for percent-change values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum FiatCurrency {
    /// United States dollar
    #[serde(rename = "USD")]
    #[display("USD")]
    Usd,
    /// Euro
    #[serde(rename = "EUR")]
    #[display("EUR")]
    Eur,
    /// Pound sterling
    #[serde(rename = "GBP")]
    #[display("GBP")]
    Gbp,
}

impl FiatCurrency {
    /// Every supported currency, in request order.
    pub const ALL: [FiatCurrency; 3] = [FiatCurrency::Usd, FiatCurrency::Eur, FiatCurrency::Gbp];

    /// Currency that percent changes are read from.
    pub const CANONICAL: FiatCurrency = FiatCurrency::Usd;

    /// ISO 4217 code, as sent in the `convert` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            FiatCurrency::Usd => "USD",
            FiatCurrency::Eur => "EUR",
            FiatCurrency::Gbp => "GBP",
        }
    }

    /// Display symbol prefixed to prices.
    pub fn symbol(self) -> &'static str {
        match self {
            FiatCurrency::Usd => "$",
            FiatCurrency::Eur => "€",
            FiatCurrency::Gbp => "£",
        }
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unsupported currency: {}", code)]
pub struct UnsupportedCurrency {
    /// The rejected code
    pub code: String,
}

impl FromStr for FiatCurrency {
    type Err = UnsupportedCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FiatCurrency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnsupportedCurrency {
                code: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_fixed() {
        let codes: Vec<_> = FiatCurrency::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes, ["USD", "EUR", "GBP"]);
        assert_eq!(FiatCurrency::ALL[0], FiatCurrency::CANONICAL);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("eur".parse::<FiatCurrency>(), Ok(FiatCurrency::Eur));
        assert_eq!(" GBP ".parse::<FiatCurrency>(), Ok(FiatCurrency::Gbp));
        assert!("JPY".parse::<FiatCurrency>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&FiatCurrency::Gbp).unwrap();
        assert_eq!(json, "\"GBP\"");
        assert_eq!(FiatCurrency::Usd.to_string(), "USD");
        assert_eq!(FiatCurrency::Eur.symbol(), "€");
    }
}
