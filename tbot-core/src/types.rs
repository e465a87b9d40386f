//! Chat-surface types: users, incoming messages, and interaction triggers.

use serde::{Deserialize, Serialize};

/// Snapshot of a chat user at event time (id, username, avatar URL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
}

/// Media attached to a chat message, copied verbatim into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub name: String,
    pub content_type: Option<String>,
}

/// A message observed in a chat thread, already reduced to what the sync core needs.
#[derive(Debug, Clone)]
pub struct IncomingChatMessage {
    pub thread_id: i64,
    pub author: ChatUser,
    /// True when the author is a bot account; mirrored messages must never include these.
    pub from_bot: bool,
    pub content: String,
    pub attachments: Vec<Attachment>,
    /// Sticker image URLs.
    pub stickers: Vec<String>,
}

/// "Open ticket" button press: where it happened and who pressed it.
#[derive(Debug, Clone)]
pub struct OpenTicketTrigger {
    pub server_id: i64,
    /// Channel the button lives in; the ticket thread is created under it.
    pub channel_id: i64,
    pub user: ChatUser,
}

/// "Close ticket" button press inside a ticket thread.
#[derive(Debug, Clone)]
pub struct CloseTicketTrigger {
    pub thread_id: i64,
    pub user: ChatUser,
    /// Message carrying the close button, so it can be disabled after use.
    pub source_message_id: i64,
}

/// Converts a transport-specific user type to core [`ChatUser`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> ChatUser;
}

/// Converts a transport-specific message type to core [`IncomingChatMessage`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> IncomingChatMessage;
}
