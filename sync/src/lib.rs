//! # sync
//!
//! The synchronization core between the chat surface and the Ticket Store.
//!
//! - [`inbound`] – chat events → store writes (open/close interactions, message mirroring)
//! - [`outbound`] – store change feed → chat reconciliation (staff delivery, status/lock/assignment)
//! - [`reconcile`] – the per-ticket assignment state and the status/lock transition table
//!
//! Both halves speak to the chat platform only through [`tbot_core::ChatGateway`],
//! so everything here runs against a mock gateway in tests.

pub mod inbound;
pub mod outbound;
pub mod reconcile;

pub use inbound::{CloseOutcome, InboundSync, OpenedTicket};
pub use outbound::{OutboundSync, StaffMessageDelivery, TicketReconciler};
pub use reconcile::{status_transition, ReconcileState, StatusAction};
