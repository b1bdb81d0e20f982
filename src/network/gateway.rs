//! Gateway - receives Discord events and hands command lines to the
//! dispatcher.
//!
//! Serenity runs each event on its own task, so invocations are concurrent
//! and interleave at every await. The only shared state is the read-only
//! `Arc<Registry>`. Handler faults are caught here, logged with full
//! detail, and swallowed from the user's perspective.

use crate::commands::{Context, Registry};
use crate::platform::{ChannelId, DiscordPlatform, Participant, ParticipantId, Platform};
use crate::telemetry;
use serenity::all::{Context as SerenityContext, EventHandler, Mentionable, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, warn};

/// Event handler owning the command registry and trigger prefix.
pub struct Gateway {
    registry: Arc<Registry>,
    prefix: String,
}

impl Gateway {
    pub fn new(registry: Arc<Registry>, prefix: String) -> Self {
        Self { registry, prefix }
    }

    /// The command line of a message, if the message is an invocation:
    /// the fixed prefix, one space, then the line handed to the dispatcher.
    fn command_line<'a>(&self, content: &'a str) -> Option<&'a str> {
        content
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix(' ')
    }
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, _ctx: SerenityContext, ready: Ready) {
        info!(user = %ready.user.name, "Logged in");
    }

    async fn message(&self, ctx: SerenityContext, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(line) = self.command_line(&msg.content) else {
            return;
        };
        let Some(guild_id) = msg.guild_id else {
            debug!(author = %msg.author.name, "Ignoring command outside a guild");
            return;
        };

        let channel = ChannelId(msg.channel_id.get());
        let author = Participant {
            id: ParticipantId(msg.author.id.get()),
            mention: msg.author.id.mention().to_string(),
        };
        let platform = DiscordPlatform::new(ctx.http.clone(), ctx.cache.clone(), guild_id);
        let dispatch_ctx = Context {
            platform: &platform,
            channel,
            author,
            registry: &self.registry,
        };

        let span = telemetry::spans::invocation(&msg.author.name, channel.0);
        async {
            debug!(content = %msg.content, "Incoming command");
            match self.registry.dispatch(&dispatch_ctx, line).await {
                Ok(Some(reply)) => {
                    if let Err(err) = platform.send_text(channel, &reply).await {
                        warn!(error = %err, "Failed to send reply");
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    error!(
                        error = %err,
                        code = err.error_code(),
                        "Command handler failed"
                    );
                }
            }
        }
        .instrument(span)
        .await;
    }
}
