//! Storage crate: the Ticket Store and its change feed.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – TicketRecord, TicketMessageRecord, ServerConfigRecord, TicketUpdate
//! - [`feed`] – ChangeFeed (added/modified/removed subscriptions)
//! - [`ticket_repo`] – TicketRepository (SQLite)
//! - [`message_repo`] – TicketMessageRepository (SQLite)
//! - [`server_repo`] – ServerConfigRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager
//! - [`store`] – TicketStore facade wiring repositories to one pool and feed

mod error;
mod feed;
mod message_repo;
mod models;
mod server_repo;
mod sqlite_pool;
mod store;
mod ticket_repo;

#[cfg(test)]
mod feed_test;
#[cfg(test)]
mod ticket_repo_test;

pub use error::StorageError;
pub use feed::{ChangeFeed, ChangeKind, StaffMessageChange, TicketChange};
pub use message_repo::TicketMessageRepository;
pub use models::{
    Assignment, MessageKind, ServerConfigRecord, TicketMessageRecord, TicketPriority,
    TicketQuery, TicketRecord, TicketStatus, TicketUpdate,
};
pub use server_repo::ServerConfigRepository;
pub use sqlite_pool::SqlitePoolManager;
pub use store::TicketStore;
pub use ticket_repo::TicketRepository;
