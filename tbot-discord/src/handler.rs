//! Serenity event handler: routes Discord events into the inbound sync.
//!
//! Thread messages are mirrored, the two ticket buttons are dispatched, and
//! the `/setup` command posts the open-ticket panel. Every failure is logged
//! and answered with a generic ephemeral reply where an interaction is
//! waiting; nothing here can take the process down.

use async_trait::async_trait;
use serenity::all::{
    CommandInteraction, ComponentInteraction, Context, CreateInteractionResponseFollowup,
    EditInteractionResponse, EventHandler, Interaction, Message, Ready, ResolvedValue,
};
use tracing::{error, info, warn};

use storage::{ServerConfigRecord, TicketStore};
use sync::{CloseOutcome, InboundSync};
use tbot_core::{CloseTicketTrigger, OpenTicketTrigger, ToCoreMessage, ToCoreUser};

use crate::adapters::{DiscordMessageWrapper, DiscordUserWrapper};
use crate::embeds::{self, CLOSE_TICKET_PREFIX, OPEN_TICKET_ID};

pub struct TicketEventHandler {
    inbound: InboundSync,
    store: TicketStore,
}

impl TicketEventHandler {
    pub fn new(inbound: InboundSync, store: TicketStore) -> Self {
        Self { inbound, store }
    }

    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        if let Err(e) = component.defer(&ctx.http).await {
            error!(error = %e, "Failed to defer component interaction");
            return;
        }

        let custom_id = component.data.custom_id.as_str();
        if custom_id == OPEN_TICKET_ID {
            self.handle_open(ctx, component).await;
        } else if custom_id.starts_with(CLOSE_TICKET_PREFIX) {
            self.handle_close(ctx, component).await;
        }
    }

    async fn handle_open(&self, ctx: &Context, component: &ComponentInteraction) {
        let Some(guild_id) = component.guild_id else {
            return;
        };

        let trigger = OpenTicketTrigger {
            server_id: guild_id.get() as i64,
            channel_id: component.channel_id.get() as i64,
            user: DiscordUserWrapper(&component.user).to_core(),
        };

        match self.inbound.open_ticket(&trigger).await {
            Ok(opened) => {
                self.followup(
                    ctx,
                    component,
                    format!(
                        "✅ Your ticket has been created in <#{}>!",
                        opened.thread.thread_id
                    ),
                )
                .await;
            }
            Err(e) => {
                error!(user_id = trigger.user.id, error = %e, "Error creating ticket");
                self.followup(
                    ctx,
                    component,
                    "❌ An error occurred while creating your ticket.".to_string(),
                )
                .await;
            }
        }
    }

    async fn handle_close(&self, ctx: &Context, component: &ComponentInteraction) {
        let trigger = CloseTicketTrigger {
            thread_id: component.channel_id.get() as i64,
            user: DiscordUserWrapper(&component.user).to_core(),
            source_message_id: component.message.id.get() as i64,
        };

        match self.inbound.close_ticket(&trigger).await {
            Ok(CloseOutcome::Closed) => {}
            Ok(CloseOutcome::Denied) => {
                self.followup(
                    ctx,
                    component,
                    "You do not have permission to close this ticket.".to_string(),
                )
                .await;
            }
            Ok(CloseOutcome::NoTicket) => {
                self.followup(
                    ctx,
                    component,
                    "Could not find a corresponding ticket for this thread.".to_string(),
                )
                .await;
            }
            Err(e) => {
                error!(thread_id = trigger.thread_id, error = %e, "Error closing ticket");
                self.followup(
                    ctx,
                    component,
                    "An error occurred while closing the ticket.".to_string(),
                )
                .await;
            }
        }
    }

    async fn handle_setup(&self, ctx: &Context, command: &CommandInteraction) {
        if let Err(e) = command.defer_ephemeral(&ctx.http).await {
            error!(error = %e, "Failed to defer setup command");
            return;
        }

        let content = match self.run_setup(ctx, command).await {
            Ok(channel_id) => format!(
                "✅ Successfully set up the ticketing system in <#{}>!",
                channel_id
            ),
            Err(e) => {
                error!(error = %e, "Error during setup command");
                "❌ An error occurred while setting up the ticketing system. Please check my \
                 permissions and try again."
                    .to_string()
            }
        };

        if let Err(e) = command
            .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
            .await
        {
            error!(error = %e, "Failed to edit setup response");
        }
    }

    /// Posts the panel and records the server config; returns the panel channel id.
    async fn run_setup(&self, ctx: &Context, command: &CommandInteraction) -> anyhow::Result<i64> {
        let guild_id = command
            .guild_id
            .ok_or_else(|| anyhow::anyhow!("setup used outside a guild"))?;

        let channel_id = command
            .data
            .options()
            .iter()
            .find_map(|opt| match &opt.value {
                ResolvedValue::Channel(channel) => Some(channel.id),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("setup requires a channel option"))?;

        let guild = ctx.http.get_guild(guild_id).await?;
        let panel = embeds::ticket_panel(&guild.name, guild.icon_url());
        let message = channel_id.send_message(&ctx.http, panel).await?;

        let config = ServerConfigRecord {
            server_id: guild_id.get() as i64,
            server_name: guild.name.clone(),
            ticket_channel_id: channel_id.get() as i64,
            ticket_message_id: message.id.get() as i64,
            access_roles: Vec::new(),
            tags: Vec::new(),
        };
        self.store
            .servers()
            .upsert(&config)
            .await
            .map_err(|e| anyhow::anyhow!("failed to save server config: {}", e))?;

        Ok(channel_id.get() as i64)
    }

    async fn followup(&self, ctx: &Context, component: &ComponentInteraction, content: String) {
        let builder = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(true);
        if let Err(e) = component.create_followup(&ctx.http, builder).await {
            error!(error = %e, "Failed to send interaction followup");
        }
    }
}

#[async_trait]
impl EventHandler for TicketEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "Bot connected");
    }

    async fn message(&self, _ctx: Context, message: Message) {
        let incoming = DiscordMessageWrapper(&message).to_core();
        if let Err(e) = self.inbound.mirror_message(&incoming).await {
            error!(
                thread_id = incoming.thread_id,
                error = %e,
                "Failed to mirror thread message"
            );
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Component(component) => {
                self.handle_component(&ctx, &component).await;
            }
            Interaction::Command(command) => {
                if command.data.name == "setup" {
                    self.handle_setup(&ctx, &command).await;
                } else {
                    warn!(command = %command.data.name, "No matching command handler");
                }
            }
            _ => {}
        }
    }
}
