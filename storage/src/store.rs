//! TicketStore facade: one pool, one change feed, all repositories.

use crate::error::StorageError;
use crate::feed::{ChangeFeed, StaffMessageChange, TicketChange};
use crate::message_repo::TicketMessageRepository;
use crate::server_repo::ServerConfigRepository;
use crate::sqlite_pool::SqlitePoolManager;
use crate::ticket_repo::TicketRepository;

/// Entry point to the Ticket Store. Cheap to clone; all clones share the pool
/// and feed, so every writer path reaches the same subscribers.
#[derive(Clone)]
pub struct TicketStore {
    tickets: TicketRepository,
    messages: TicketMessageRepository,
    servers: ServerConfigRepository,
    feed: ChangeFeed,
}

impl TicketStore {
    /// Opens (and if needed creates) the database and its tables.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let feed = ChangeFeed::new();

        let tickets = TicketRepository::new(pool_manager.clone(), feed.clone()).await?;
        let messages = TicketMessageRepository::new(pool_manager.clone(), feed.clone()).await?;
        let servers = ServerConfigRepository::new(pool_manager).await?;

        Ok(Self {
            tickets,
            messages,
            servers,
            feed,
        })
    }

    pub fn tickets(&self) -> &TicketRepository {
        &self.tickets
    }

    pub fn messages(&self) -> &TicketMessageRepository {
        &self.messages
    }

    pub fn servers(&self) -> &ServerConfigRepository {
        &self.servers
    }

    /// Live subscription to ticket added/modified/removed changes.
    pub fn subscribe_tickets(&self) -> tokio::sync::broadcast::Receiver<TicketChange> {
        self.feed.subscribe_tickets()
    }

    /// Live subscription to newly appended staff messages.
    pub fn subscribe_staff_messages(
        &self,
    ) -> tokio::sync::broadcast::Receiver<StaffMessageChange> {
        self.feed.subscribe_staff_messages()
    }
}
