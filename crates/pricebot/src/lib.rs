//! Pricebot: a Discord bot answering `!<symbol>` with cryptocurrency prices.
//!
//! This crate re-exports the workspace crates and adds the pieces the binary
//! needs: layered configuration, credentials, logging setup and wiring.
//!
//! # Example
//!
//! ```no_run
//! use pricebot::{Credentials, PricebotConfig, Services};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PricebotConfig::load()?;
//! let credentials = Credentials::new(
//!     std::env::var("DISCORD_TOKEN").ok(),
//!     std::env::var("CMC_API_KEY").ok(),
//!     std::env::var("IMGUR_CLIENT_ID").ok(),
//! )?;
//! let services = Services::from_config(&config, &credentials);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod cli;
mod config;
mod credentials;
mod observability;

pub use app::{Services, spawn_cache_sweeper};
pub use cli::Cli;
pub use config::{HttpSettings, LoggingSettings, PricebotConfig};
pub use credentials::{CMC_API_KEY_VAR, Credentials, DISCORD_TOKEN_VAR, IMGUR_CLIENT_ID_VAR};
pub use observability::{ObservabilityConfig, init_observability};

pub use pricebot_cache::*;
pub use pricebot_chart::*;
pub use pricebot_error::*;
pub use pricebot_market::*;
pub use pricebot_social::*;
