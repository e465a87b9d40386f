//! Partial ticket update, applied by TicketRepository::update.
//!
//! The dashboard PATCH body deserializes straight into this.

use serde::{Deserialize, Serialize};

use super::{TicketPriority, TicketStatus};

/// Assignment change: either a staff member with display snapshots, or unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    Assigned {
        staff_id: String,
        name: String,
        avatar: Option<String>,
    },
    Unassigned,
}

/// Fields a caller may change on a ticket. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    /// `Some` rewrites all three assignment columns together, so the display
    /// snapshots can never go stale against the id.
    pub assignment: Option<Assignment>,
    pub tags: Option<Vec<String>>,
    pub is_read: Option<bool>,
}

impl TicketUpdate {
    /// Update that only transitions status.
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
