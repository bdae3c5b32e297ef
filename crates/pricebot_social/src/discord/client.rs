//! Discord bot client setup and lifecycle management.

use super::{DiscordError, DiscordErrorKind, PricebotHandler};
use crate::CommandDispatcher;
use serenity::Client;
use std::sync::Arc;
use tracing::{info, instrument};

/// Discord client answering price commands.
///
/// # Example
/// ```no_run
/// use pricebot_social::{CommandDispatcher, PricebotBot};
/// use std::sync::Arc;
///
/// # async fn run(dispatcher: CommandDispatcher) -> Result<(), Box<dyn std::error::Error>> {
/// let token = std::env::var("DISCORD_TOKEN")?;
/// let mut bot = PricebotBot::new(token, Arc::new(dispatcher)).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct PricebotBot {
    client: Client,
}

impl PricebotBot {
    /// Build the serenity client.
    ///
    /// # Errors
    ///
    /// `InvalidToken` for an empty token, `ConnectionFailed` if the client
    /// cannot be built.
    #[instrument(skip(token, dispatcher), fields(token_len = token.len()))]
    pub async fn new(token: String, dispatcher: Arc<CommandDispatcher>) -> Result<Self, DiscordError> {
        if token.trim().is_empty() {
            return Err(DiscordError::new(DiscordErrorKind::InvalidToken));
        }

        let handler = PricebotHandler::new(dispatcher);
        let intents = PricebotHandler::intents();
        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Run until the gateway connection ends.
    ///
    /// # Errors
    ///
    /// `ConnectionFailed` on a fatal client error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), DiscordError> {
        info!("Starting Discord bot");

        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }
}
