//! Inbound sync: chat-platform events become Ticket Store writes.
//!
//! The Discord layer reduces raw events to the trigger types in `tbot-core`
//! and calls in here; everything below the trigger is transport-agnostic.

use std::sync::Arc;

use tbot_core::{
    ChatGateway, CloseTicketTrigger, ClosedBy, IncomingChatMessage, OpenTicketTrigger, Result,
    TbotError, ThreadNotice, ThreadRef,
};
use tracing::{info, warn};

use storage::{TicketMessageRecord, TicketRecord, TicketStatus, TicketStore, TicketUpdate};

/// Result of an open-ticket interaction: the record plus the thread it lives in.
#[derive(Debug, Clone)]
pub struct OpenedTicket {
    pub ticket: TicketRecord,
    pub thread: ThreadRef,
}

/// Outcome of a close-ticket interaction, for the caller to translate into a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The triggering user is not the ticket opener; nothing was written.
    Denied,
    /// The thread has no corresponding ticket.
    NoTicket,
}

/// Converts chat events (button presses, thread messages) into store writes.
#[derive(Clone)]
pub struct InboundSync {
    store: TicketStore,
    gateway: Arc<dyn ChatGateway>,
}

impl InboundSync {
    pub fn new(store: TicketStore, gateway: Arc<dyn ChatGateway>) -> Self {
        Self { store, gateway }
    }

    /// Opens a ticket for the triggering user: private thread, membership,
    /// store record, welcome message with the close control.
    ///
    /// If the record write fails the just-created thread is deleted on a
    /// best-effort basis; a failed deletion leaves an orphan thread with no
    /// record, which is a documented gap of this flow.
    pub async fn open_ticket(&self, trigger: &OpenTicketTrigger) -> Result<OpenedTicket> {
        let name = format!("ticket-{}", trigger.user.username);
        let thread = self
            .gateway
            .create_private_thread(trigger.server_id, trigger.channel_id, &name)
            .await?;

        self.gateway
            .add_thread_member(&thread, trigger.user.id)
            .await?;

        let ticket = TicketRecord::new(trigger.server_id, thread.thread_id, &trigger.user);
        if let Err(e) = self.store.tickets().create(&ticket).await {
            if let Err(cleanup) = self.gateway.delete_thread(&thread).await {
                warn!(
                    thread_id = thread.thread_id,
                    error = %cleanup,
                    "Failed to delete orphaned thread after store write failure"
                );
            }
            return Err(TbotError::Store(e.to_string()));
        }

        let welcome = ThreadNotice::Welcome {
            ticket_id: ticket.id.clone(),
            ticket_ref: ticket.short_ref().to_string(),
            opener_id: trigger.user.id,
        };
        self.gateway.send_notice(&thread, &welcome).await?;

        info!(
            ticket_id = %ticket.id,
            thread_id = thread.thread_id,
            opener_id = trigger.user.id,
            "Opened ticket"
        );
        Ok(OpenedTicket { ticket, thread })
    }

    /// Closes a ticket from its thread. Only the opener may close; anyone else
    /// gets `Denied` and no state changes.
    pub async fn close_ticket(&self, trigger: &CloseTicketTrigger) -> Result<CloseOutcome> {
        let ticket = self
            .store
            .tickets()
            .find_by_thread_id(trigger.thread_id)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        let Some(ticket) = ticket else {
            return Ok(CloseOutcome::NoTicket);
        };

        if ticket.opener_id != trigger.user.id {
            info!(
                ticket_id = %ticket.id,
                user_id = trigger.user.id,
                "Close denied: not the ticket opener"
            );
            return Ok(CloseOutcome::Denied);
        }

        self.store
            .tickets()
            .update(&ticket.id, &TicketUpdate::status(TicketStatus::Closed))
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        let thread = ThreadRef {
            server_id: ticket.server_id,
            thread_id: ticket.thread_id,
        };
        self.gateway
            .set_locked(&thread, true, "Ticket closed by user.")
            .await?;
        self.gateway
            .send_notice(
                &thread,
                &ThreadNotice::Closed {
                    by: ClosedBy::Opener {
                        user_id: trigger.user.id,
                    },
                },
            )
            .await?;
        self.gateway
            .disable_close_control(&thread, trigger.source_message_id, &ticket.id)
            .await?;

        info!(ticket_id = %ticket.id, thread_id = thread.thread_id, "Closed ticket");
        Ok(CloseOutcome::Closed)
    }

    /// Mirrors a thread message into the ticket's message sub-collection and
    /// bumps the parent's freshness flags. Messages from bots or from threads
    /// with no ticket are ignored; returns whether anything was written.
    pub async fn mirror_message(&self, message: &IncomingChatMessage) -> Result<bool> {
        if message.from_bot {
            return Ok(false);
        }

        let ticket = self
            .store
            .tickets()
            .find_by_thread_id(message.thread_id)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        let Some(ticket) = ticket else {
            return Ok(false);
        };

        let record = TicketMessageRecord::inbound(
            &ticket.id,
            &message.author,
            message.content.clone(),
            message.attachments.clone(),
            message.stickers.clone(),
        );
        self.store
            .messages()
            .append(&record)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;
        self.store
            .tickets()
            .touch_last_message(&ticket.id)
            .await
            .map_err(|e| TbotError::Store(e.to_string()))?;

        info!(
            ticket_id = %ticket.id,
            author_id = message.author.id,
            "Mirrored thread message"
        );
        Ok(true)
    }
}
