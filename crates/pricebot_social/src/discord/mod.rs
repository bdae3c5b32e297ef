//! Discord integration via serenity.

mod client;
mod embed;
mod error;
mod handler;

pub use client::PricebotBot;
pub use embed::to_create_embed;
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use handler::PricebotHandler;
