//! Reconciliation helpers shared by the outbound subscriptions.
//!
//! [`ReconcileState`] tracks the last observed `assigned_to` per ticket id so
//! assignment edges can be detected across consecutive change events; the
//! store delivers current state, not diffs. It is owned by the reconciler,
//! rebuilt from the store at startup, and never persisted.
//!
//! [`status_transition`] is the status × lock transition table: given the
//! ticket's new status and the thread's current lock state, it names the one
//! chat-side action to take, or none.

use std::collections::HashMap;

use storage::TicketStatus;

/// Chat-side action demanded by a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Render a closure notice and lock the thread.
    Close,
    /// Render a resolution notice; lock state untouched.
    Resolve,
    /// Render a re-open notice and unlock the thread.
    Reopen,
}

/// Transition table for status reconciliation, evaluated only when no
/// assignment edge claimed the event.
///
/// The lock state is the guard that makes reconciliation idempotent: a closed
/// ticket whose thread is already locked needs nothing, as does an open ticket
/// whose thread is already unlocked.
pub fn status_transition(status: TicketStatus, locked: bool) -> Option<StatusAction> {
    match (status, locked) {
        (TicketStatus::Closed, false) => Some(StatusAction::Close),
        (TicketStatus::Closed, true) => None,
        (TicketStatus::Resolved, _) => Some(StatusAction::Resolve),
        (TicketStatus::Open, true) => Some(StatusAction::Reopen),
        (TicketStatus::Open, false) => None,
    }
}

/// Last observed `assigned_to` per ticket id. Non-durable by design.
#[derive(Debug, Default)]
pub struct ReconcileState {
    last_assigned: HashMap<String, Option<String>>,
}

impl ReconcileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current value without reporting an edge. Used for `Added`
    /// events and the startup scan.
    pub fn seed(&mut self, ticket_id: &str, assigned_to: Option<&str>) {
        self.last_assigned
            .insert(ticket_id.to_string(), assigned_to.map(str::to_string));
    }

    /// Records the observed value and reports whether it differs from the
    /// previous observation for this ticket. A ticket never seen before only
    /// counts as an edge when it arrives already assigned; reporting an
    /// "unassigned" edge for a ticket we have no history on would be noise.
    pub fn observe(&mut self, ticket_id: &str, assigned_to: Option<&str>) -> bool {
        let current = assigned_to.map(str::to_string);
        match self
            .last_assigned
            .insert(ticket_id.to_string(), current.clone())
        {
            Some(previous) => previous != current,
            None => current.is_some(),
        }
    }

    /// Drops the entry for a removed ticket.
    pub fn forget(&mut self, ticket_id: &str) {
        self.last_assigned.remove(ticket_id);
    }

    pub fn len(&self) -> usize {
        self.last_assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_assigned.is_empty()
    }
}
