//! Ticket message record model for persistence.
//!
//! Maps to the `ticket_messages` table and is used by TicketMessageRepository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tbot_core::{Attachment, ChatUser};
use uuid::Uuid;

/// User content vs. system-generated audit narrative ("event").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Event,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketMessageRecord {
    pub id: String,
    pub ticket_id: String,
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub content: String,
    pub is_staff: bool,
    /// Staff-only: mention the opener when rendering into chat.
    pub ping_user: bool,
    /// Delivery acknowledgment for staff messages; inbound and event rows are
    /// born true since they never enter the delivery path.
    pub sent_to_discord: bool,
    pub kind: MessageKind,
    #[sqlx(json)]
    pub attachments: Vec<Attachment>,
    #[sqlx(json)]
    pub stickers: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

impl TicketMessageRecord {
    /// A message mirrored from the chat thread (opener or other members).
    pub fn inbound(
        ticket_id: &str,
        author: &ChatUser,
        content: String,
        attachments: Vec<Attachment>,
        stickers: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id: ticket_id.to_string(),
            author_id: author.id,
            author_username: author.username.clone(),
            author_avatar: Some(author.avatar_url.clone()),
            content,
            is_staff: false,
            ping_user: false,
            sent_to_discord: true,
            kind: MessageKind::User,
            attachments,
            stickers,
            sent_at: Utc::now(),
        }
    }

    /// A staff reply authored on the dashboard; undelivered until Outbound Sync
    /// renders it into the thread.
    pub fn staff(
        ticket_id: &str,
        author_id: i64,
        author_username: String,
        author_avatar: Option<String>,
        content: String,
        ping_user: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id: ticket_id.to_string(),
            author_id,
            author_username,
            author_avatar,
            content,
            is_staff: true,
            ping_user,
            sent_to_discord: false,
            kind: MessageKind::User,
            attachments: Vec::new(),
            stickers: Vec::new(),
            sent_at: Utc::now(),
        }
    }

    /// A system audit event ("Ticket closed by staff." etc.). Born delivered:
    /// the thread notice is its chat-side representation.
    pub fn event(ticket_id: &str, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id: ticket_id.to_string(),
            author_id: 0,
            author_username: "system".to_string(),
            author_avatar: None,
            content,
            is_staff: true,
            ping_user: false,
            sent_to_discord: true,
            kind: MessageKind::Event,
            attachments: Vec::new(),
            stickers: Vec::new(),
            sent_at: Utc::now(),
        }
    }
}
