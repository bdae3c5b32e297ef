//! API credentials.

use derive_getters::Getters;
use pricebot_error::{ConfigError, ConfigErrorKind};

/// Environment variable holding the Discord bot token
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_TOKEN";
/// Environment variable holding the CoinMarketCap API key
pub const CMC_API_KEY_VAR: &str = "CMC_API_KEY";
/// Environment variable holding the Imgur client id
pub const IMGUR_CLIENT_ID_VAR: &str = "IMGUR_CLIENT_ID";

/// Secrets required to start the bot. All three must be non-empty.
#[derive(Clone, Getters)]
pub struct Credentials {
    discord_token: String,
    cmc_api_key: String,
    imgur_client_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("discord_token", &"<redacted>")
            .field("cmc_api_key", &"<redacted>")
            .field("imgur_client_id", &"<redacted>")
            .finish()
    }
}

fn require(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingCredential(name)))
}

impl Credentials {
    /// Validate raw values.
    ///
    /// # Errors
    ///
    /// `MissingCredential` for the first absent or blank value, checked in
    /// the order Discord, CoinMarketCap, Imgur.
    ///
    /// # Example
    ///
    /// ```
    /// use pricebot::Credentials;
    ///
    /// let err = Credentials::new(Some("token".into()), None, Some("id".into())).unwrap_err();
    /// assert!(err.to_string().contains("CMC_API_KEY"));
    /// ```
    pub fn new(
        discord_token: Option<String>,
        cmc_api_key: Option<String>,
        imgur_client_id: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            discord_token: require(DISCORD_TOKEN_VAR, discord_token)?,
            cmc_api_key: require(CMC_API_KEY_VAR, cmc_api_key)?,
            imgur_client_id: require(IMGUR_CLIENT_ID_VAR, imgur_client_id)?,
        })
    }
}
