//! Ticket record model for persistence.
//!
//! Maps to the `tickets` table and is used by TicketRepository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tbot_core::ChatUser;
use uuid::Uuid;

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

/// Staff-facing ticket priority; has no chat-side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketRecord {
    pub id: String,
    pub server_id: i64,
    /// One open chat thread per ticket; unique across the table.
    pub thread_id: i64,
    pub opener_id: i64,
    pub opener_username: String,
    pub opener_avatar: String,
    pub title: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub assigned_to_avatar: Option<String>,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// Set exactly when `status` is `closed`.
    pub closed_at: Option<DateTime<Utc>>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub is_read: bool,
}

impl TicketRecord {
    /// Creates a fresh open ticket with a generated UUID, defaults from the
    /// opener snapshot, and the current timestamp.
    pub fn new(server_id: i64, thread_id: i64, opener: &ChatUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            server_id,
            thread_id,
            opener_id: opener.id,
            opener_username: opener.username.clone(),
            opener_avatar: opener.avatar_url.clone(),
            title: format!("Ticket by {}", opener.username),
            status: TicketStatus::Open,
            priority: TicketPriority::Low,
            assigned_to: None,
            assigned_to_name: None,
            assigned_to_avatar: None,
            tags: Vec::new(),
            created_at: Utc::now(),
            closed_at: None,
            last_message_at: None,
            is_read: true,
        }
    }

    /// Short display reference: the first six characters of the id.
    pub fn short_ref(&self) -> &str {
        &self.id[..self.id.len().min(6)]
    }
}

/// Filter for ticket listings.
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    pub server_id: Option<i64>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<String>,
    pub limit: Option<i64>,
}
