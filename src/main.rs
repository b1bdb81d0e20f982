//! kbot entry point: config, registry, Discord client.

use kbot::commands::Registry;
use kbot::config::Config;
use kbot::network::Gateway;
use kbot::telemetry;
use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    // The token is a secret and only ever comes from the environment.
    let token = Config::token().map_err(|e| {
        error!(error = %e, "Discord token missing");
        e
    })?;

    let registry = Arc::new(Registry::builtin()?);
    info!(
        commands = registry.len(),
        prefix = %config.bot.prefix,
        "Starting kbot"
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(&token, intents)
        .event_handler(Gateway::new(registry, config.bot.prefix))
        .await?;

    client.start().await?;

    Ok(())
}
