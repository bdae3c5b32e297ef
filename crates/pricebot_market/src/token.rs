//! Asset name helpers.

/// Replace spaces in an asset name with hyphens so it can be used in a URL
/// path.
///
/// # Examples
///
/// ```
/// use pricebot_market::encode_token_name;
///
/// assert_eq!(encode_token_name("Bitcoin Cash"), "Bitcoin-Cash");
/// assert_eq!(encode_token_name("Ethereum"), "Ethereum");
/// ```
pub fn encode_token_name(name: &str) -> String {
    name.replace(' ', "-")
}

/// Lowercase URL slug for an asset name, as used by CoinGecko and
/// CoinMarketCap page URLs.
///
/// # Examples
///
/// ```
/// use pricebot_market::token_slug;
///
/// assert_eq!(token_slug("Bitcoin Cash"), "bitcoin-cash");
/// ```
pub fn token_slug(name: &str) -> String {
    encode_token_name(name).to_lowercase()
}
