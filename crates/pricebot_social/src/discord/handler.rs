//! Serenity event handler for price commands.

use super::{DiscordError, DiscordErrorKind, DiscordResult, to_create_embed};
use crate::{CommandDispatcher, DispatchPhase, InboundMessage, Reply};
use serenity::all::{ChannelId, CreateMessage, Message, Ready, UserId};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Event handler answering prefixed price commands.
///
/// Every message event runs on its own task, so several users can be served
/// at once.
pub struct PricebotHandler {
    dispatcher: Arc<CommandDispatcher>,
}

impl PricebotHandler {
    /// Create a handler routing messages to `dispatcher`.
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }
}

/// View of a Discord message for the dispatcher, given the bot's own id.
fn inbound_message(author_id: UserId, bot_id: UserId, content: &str) -> InboundMessage {
    InboundMessage {
        from_self: author_id == bot_id,
        content: content.to_string(),
    }
}

async fn send_reply(ctx: &Context, channel_id: ChannelId, reply: Reply) -> DiscordResult<()> {
    let sent = match reply {
        Reply::Text(text) => channel_id.say(&ctx.http, text).await,
        Reply::Embed(embed) => {
            channel_id
                .send_message(&ctx.http, CreateMessage::new().embed(to_create_embed(&embed)))
                .await
        }
    };

    sent.map(|_| ())
        .map_err(|e| DiscordError::new(DiscordErrorKind::MessageSendFailed(e.to_string())))
}

#[async_trait]
impl EventHandler for PricebotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let bot_id = ctx.cache.current_user().id;
        let inbound = inbound_message(msg.author.id, bot_id, &msg.content);

        let Some(reply) = self.dispatcher.dispatch(&inbound).await else {
            trace!(phase = %DispatchPhase::Idle, "Ignoring message");
            return;
        };

        debug!(
            channel_id = %msg.channel_id,
            author = %msg.author.name,
            phase = %DispatchPhase::Responding,
            "Sending reply"
        );

        if let Err(e) = send_reply(&ctx, msg.channel_id, reply).await {
            error!(channel_id = %msg.channel_id, error = %e, "Failed to send reply");
        }
    }
}
