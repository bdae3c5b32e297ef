//! Command dispatch: parse, fetch, format.

use crate::{CommandSettings, PriceEmbed, format_price_embed, parse_command};
use pricebot_chart::ChartRenderer;
use pricebot_market::{HistorySource, QuoteSource};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Stage a dispatch is in, used as a tracing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DispatchPhase {
    /// Waiting for a message
    #[display("idle")]
    Idle,
    /// Extracting the symbol
    #[display("parsing")]
    Parsing,
    /// Fetching quote, history and chart
    #[display("fetching")]
    Fetching,
    /// Sending the reply
    #[display("responding")]
    Responding,
}

/// A chat message as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Whether the bot itself authored the message
    pub from_self: bool,
    /// Raw message text
    pub content: String,
}

impl InboundMessage {
    /// Message from another user.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            from_self: false,
            content: content.into(),
        }
    }

    /// Message authored by the bot.
    pub fn from_bot_self(content: impl Into<String>) -> Self {
        Self {
            from_self: true,
            content: content.into(),
        }
    }
}

/// What to send back to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text, used for errors
    Text(String),
    /// Price embed
    Embed(PriceEmbed),
}

/// Routes prefixed price commands to the market sources and chart renderer.
///
/// Sources are expected to be the cache-checked wrappers so repeated
/// requests inside the TTL do not reach the upstream APIs.
pub struct CommandDispatcher {
    quotes: Arc<dyn QuoteSource>,
    history: Arc<dyn HistorySource>,
    charts: ChartRenderer,
    settings: CommandSettings,
}

impl CommandDispatcher {
    /// Create a dispatcher with default command settings.
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        history: Arc<dyn HistorySource>,
        charts: ChartRenderer,
    ) -> Self {
        Self {
            quotes,
            history,
            charts,
            settings: CommandSettings::default(),
        }
    }

    /// Replace the command settings.
    pub fn with_settings(mut self, settings: CommandSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Command settings in use.
    pub fn settings(&self) -> &CommandSettings {
        &self.settings
    }

    /// Handle one inbound message.
    ///
    /// Returns `None` for the bot's own messages and for anything that is not
    /// a price command.
    #[instrument(skip(self, message), fields(phase = %DispatchPhase::Parsing))]
    pub async fn dispatch(&self, message: &InboundMessage) -> Option<Reply> {
        if message.from_self {
            return None;
        }
        let symbol = parse_command(self.settings.prefix(), &message.content)?;
        Some(self.respond(&symbol).await)
    }

    /// Build the reply for an already-parsed symbol.
    #[instrument(skip(self), fields(phase = %DispatchPhase::Fetching))]
    pub async fn respond(&self, symbol: &str) -> Reply {
        info!(symbol, "Price requested");

        let record = match self.quotes.fetch_quote(symbol).await {
            Ok(record) => record,
            Err(e) => {
                warn!(symbol, error = ?e, "Quote unavailable");
                return Reply::Text(e.reply_text());
            }
        };

        let days = *self.charts.settings().days();
        let series = self.history.history_or_unavailable(record.name(), days).await;
        let chart_url = match self.charts.render_and_upload(record.name(), days, series).await {
            Ok(url) => url,
            Err(e) => {
                warn!(symbol, error = %e, "Chart failed, replying without it");
                None
            }
        };

        debug!(symbol, phase = %DispatchPhase::Responding, chart = chart_url.is_some(), "Reply ready");
        Reply::Embed(format_price_embed(&record, chart_url.as_deref()))
    }
}
