//! Cryptocurrency market data for pricebot.
//!
//! - [`FiatCurrency`]: the closed set of quote currencies
//! - [`QuoteSource`] / [`CoinMarketCapClient`]: latest prices and percent changes
//! - [`HistorySource`] / [`CoinGeckoClient`]: historical USD prices
//! - [`CachedQuoteSource`] / [`CachedHistorySource`]: the same, behind the
//!   shared response cache

#![warn(missing_docs)]

mod cached;
mod coingecko;
mod coinmarketcap;
mod currency;
mod history;
mod quote;
mod source;
mod token;

pub use cached::{
    CachedHistorySource, CachedQuoteSource, HISTORY_CACHE_PREFIX, QUOTE_CACHE_PREFIX,
    history_cache_key, quote_cache_key,
};
pub use coingecko::{COINGECKO_API_URL, CoinGeckoClient, parse_market_chart};
pub use coinmarketcap::{
    COINMARKETCAP_QUOTES_URL, CoinMarketCapClient, CurrencyQuote, assemble_quote,
    parse_quote_body,
};
pub use currency::{FiatCurrency, UnsupportedCurrency};
pub use history::{HistoricalSeries, PricePoint};
pub use quote::{PercentChanges, QuoteRecord, format_price};
pub use source::{HistorySource, QuoteSource};
pub use token::{encode_token_name, token_slug};
