//! Change feed: broadcast subscriptions over store mutations.
//!
//! Every repository write publishes here after its SQL commit, so subscribers
//! observe per-record changes in commit order. Events carry the post-write row
//! (current state, not a diff). The feed is in-process and non-durable; a
//! subscriber that lags simply misses events.

use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{TicketMessageRecord, TicketRecord};

const FEED_CAPACITY: usize = 256;

/// What happened to a ticket record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// A ticket mutation, carrying the row as written.
#[derive(Debug, Clone)]
pub struct TicketChange {
    pub kind: ChangeKind,
    pub ticket: TicketRecord,
}

/// A newly appended staff message (the `is_staff = true`, added-only query).
/// Edits never emit; audit events never emit.
#[derive(Debug, Clone)]
pub struct StaffMessageChange {
    pub ticket_id: String,
    pub message: TicketMessageRecord,
}

/// Fan-out of store mutations to the outbound sync subscriptions.
#[derive(Clone)]
pub struct ChangeFeed {
    tickets_tx: broadcast::Sender<TicketChange>,
    staff_tx: broadcast::Sender<StaffMessageChange>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tickets_tx, _) = broadcast::channel(FEED_CAPACITY);
        let (staff_tx, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tickets_tx,
            staff_tx,
        }
    }

    /// Subscribes to all ticket changes, live from the point of the call.
    pub fn subscribe_tickets(&self) -> broadcast::Receiver<TicketChange> {
        self.tickets_tx.subscribe()
    }

    /// Subscribes to newly appended staff messages.
    pub fn subscribe_staff_messages(&self) -> broadcast::Receiver<StaffMessageChange> {
        self.staff_tx.subscribe()
    }

    pub(crate) fn publish_ticket(&self, kind: ChangeKind, ticket: TicketRecord) {
        // Send only fails when nobody is subscribed; that is fine.
        if self.tickets_tx.send(TicketChange { kind, ticket }).is_err() {
            debug!("Ticket change dropped: no subscribers");
        }
    }

    pub(crate) fn publish_staff_message(&self, message: TicketMessageRecord) {
        let change = StaffMessageChange {
            ticket_id: message.ticket_id.clone(),
            message,
        };
        if self.staff_tx.send(change).is_err() {
            debug!("Staff message change dropped: no subscribers");
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
