//! Chat gateway abstraction: thread and notice primitives over the chat platform.
//!
//! [`ChatGateway`] is transport-agnostic; the Discord implementation lives in
//! tbot-discord. The sync core only ever decides *what* to render — a
//! [`ThreadNotice`] — and leaves embeds, buttons, and wire formats to the adapter.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Handle to a ticket thread: the server it belongs to plus the thread channel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRef {
    pub server_id: i64,
    pub thread_id: i64,
}

/// A resolved thread together with its current lock state.
#[derive(Debug, Clone, Copy)]
pub struct ThreadState {
    pub thread: ThreadRef,
    pub locked: bool,
}

/// Who closed a ticket; changes the wording of the closure notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosedBy {
    /// The ticket opener, via the close button in the thread.
    Opener { user_id: i64 },
    /// A staff member, via the dashboard.
    Staff,
}

/// Everything the sync core renders into a ticket thread.
#[derive(Debug, Clone)]
pub enum ThreadNotice {
    /// First message of a new ticket thread; carries the close control.
    Welcome {
        /// Full ticket id, embedded in the close button so the control is scoped.
        ticket_id: String,
        /// Short display reference, e.g. the first six characters of the id.
        ticket_ref: String,
        opener_id: i64,
    },
    /// A staff reply authored on the dashboard.
    StaffReply {
        author_username: String,
        author_avatar: Option<String>,
        content: String,
        /// When set, the rendered message mentions this user (the opener).
        ping_user_id: Option<i64>,
        sent_at: DateTime<Utc>,
    },
    Assigned { staff_name: String },
    Unassigned,
    Closed { by: ClosedBy },
    Resolved,
    Reopened,
}

/// Thread and message operations the sync core needs from the chat platform.
///
/// Implementations map to a transport (Discord in production, a mock in tests).
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Creates a private thread under `channel_id` and returns its handle.
    async fn create_private_thread(
        &self,
        server_id: i64,
        channel_id: i64,
        name: &str,
    ) -> Result<ThreadRef>;

    /// Deletes a thread. Used only for best-effort cleanup of orphans.
    async fn delete_thread(&self, thread: &ThreadRef) -> Result<()>;

    /// Adds a user to a thread so they can see and post in it.
    async fn add_thread_member(&self, thread: &ThreadRef, user_id: i64) -> Result<()>;

    /// Resolves a thread via the platform (guild then channel) and reports its lock state.
    async fn fetch_thread(&self, server_id: i64, thread_id: i64) -> Result<ThreadState>;

    /// Renders a notice into the thread.
    async fn send_notice(&self, thread: &ThreadRef, notice: &ThreadNotice) -> Result<()>;

    /// Locks or unlocks the thread. `reason` goes to the platform's audit log.
    async fn set_locked(&self, thread: &ThreadRef, locked: bool, reason: &str) -> Result<()>;

    /// Disables the close control on an already-sent message so it cannot fire twice.
    async fn disable_close_control(
        &self,
        thread: &ThreadRef,
        message_id: i64,
        ticket_id: &str,
    ) -> Result<()>;
}
