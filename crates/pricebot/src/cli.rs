//! Command-line interface.

use crate::Credentials;
use clap::Parser;
use pricebot_error::ConfigError;
use std::path::PathBuf;

/// Discord bot answering `!<symbol>` with prices and a 30-day chart.
#[derive(Parser, Debug)]
#[command(name = "pricebot", version, about, long_about = None)]
pub struct Cli {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub discord_token: Option<String>,

    /// CoinMarketCap API key
    #[arg(long, env = "CMC_API_KEY", hide_env_values = true)]
    pub cmc_api_key: Option<String>,

    /// Imgur client id for chart uploads
    #[arg(long, env = "IMGUR_CLIENT_ID", hide_env_values = true)]
    pub imgur_client_id: Option<String>,

    /// Configuration file replacing ./pricebot.toml
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON logs regardless of configuration
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Validated credentials from flags or environment.
    ///
    /// # Errors
    ///
    /// `MissingCredential` if any credential is absent or blank.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Credentials::new(
            self.discord_token.clone(),
            self.cmc_api_key.clone(),
            self.imgur_client_id.clone(),
        )
    }
}
