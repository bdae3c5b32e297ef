//! Pricebot binary.

use clap::Parser;
use pricebot::{Cli, ObservabilityConfig, PricebotBot, PricebotConfig, Services};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before clap reads env fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PricebotConfig::load_with(path)?,
        None => PricebotConfig::load()?,
    };

    pricebot::init_observability(
        &ObservabilityConfig::new()
            .with_verbose(cli.verbose)
            .with_json_logs(cli.json_logs || *config.logging().json()),
    )?;

    let credentials = cli.credentials().inspect_err(|e| {
        error!(error = %e, "Startup aborted");
    })?;

    let services = Services::from_config(&config, &credentials);
    let sweeper = pricebot::spawn_cache_sweeper(services.cache.clone(), config.cache().ttl());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting pricebot");
    let mut bot = PricebotBot::new(credentials.discord_token().clone(), services.dispatcher).await?;
    let result = bot.start().await;

    sweeper.abort();
    result?;
    Ok(())
}
