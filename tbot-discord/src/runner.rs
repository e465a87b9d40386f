//! Client runner: builds the serenity client around the event handler and
//! blocks on the gateway connection until shutdown.

use anyhow::Result;
use serenity::all::{Client, GatewayIntents};
use tracing::info;

use crate::handler::TicketEventHandler;

/// Starts the Discord client with the intents the ticket flows need
/// (guilds, guild messages, message content, members).
pub async fn run_gateway(token: &str, handler: TicketEventHandler) -> Result<()> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS;

    info!("Starting Discord client");
    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await?;

    client.start().await?;
    Ok(())
}
