//! Chat front end for pricebot.
//!
//! [`CommandDispatcher`] turns prefixed messages such as `!btc` into a
//! [`Reply`]: an error text, or a [`PriceEmbed`] with prices, percent changes
//! and an optional hosted chart. With the `discord` feature, [`PricebotBot`]
//! connects the dispatcher to a Discord gateway.

#![warn(missing_docs)]

mod command;
mod dispatcher;
mod format;

#[cfg(feature = "discord")]
mod discord;

pub use command::{CommandSettings, parse_command};
pub use dispatcher::{CommandDispatcher, DispatchPhase, InboundMessage, Reply};
pub use format::{
    EMBED_COLOR, EmbedField, NO_CHART_TITLE, PriceEmbed, coinmarketcap_url, format_change,
    format_price, format_price_embed,
};

#[cfg(feature = "discord")]
pub use discord::{
    DiscordError, DiscordErrorKind, DiscordResult, PricebotBot, PricebotHandler, to_create_embed,
};
