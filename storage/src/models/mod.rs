//! Record models for the ticket store.

mod message_record;
mod server_record;
mod ticket_record;
mod ticket_update;

pub use message_record::{MessageKind, TicketMessageRecord};
pub use server_record::ServerConfigRecord;
pub use ticket_record::{TicketPriority, TicketQuery, TicketRecord, TicketStatus};
pub use ticket_update::{Assignment, TicketUpdate};
