//! Ticket message repository: the per-ticket message sub-collection.
//!
//! Appending a staff message publishes a [`StaffMessageChange`]; inbound and
//! audit-event rows never do. `mark_delivered` is the idempotent half of the
//! at-most-once delivery guard: it only flips the flag when it is still unset.

use tracing::info;

use crate::error::StorageError;
use crate::feed::ChangeFeed;
use crate::models::TicketMessageRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TicketMessageRepository {
    pool_manager: SqlitePoolManager,
    feed: ChangeFeed,
}

impl TicketMessageRepository {
    pub(crate) async fn new(
        pool_manager: SqlitePoolManager,
        feed: ChangeFeed,
    ) -> Result<Self, sqlx::Error> {
        let repo = Self { pool_manager, feed };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ticket_messages (
                id TEXT PRIMARY KEY,
                ticket_id TEXT NOT NULL,
                author_id INTEGER NOT NULL,
                author_username TEXT NOT NULL,
                author_avatar TEXT,
                content TEXT NOT NULL,
                is_staff INTEGER NOT NULL,
                ping_user INTEGER NOT NULL DEFAULT 0,
                sent_to_discord INTEGER NOT NULL DEFAULT 0,
                kind TEXT NOT NULL DEFAULT 'user',
                attachments TEXT NOT NULL DEFAULT '[]',
                stickers TEXT NOT NULL DEFAULT '[]',
                sent_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_ticket_messages_ticket_id ON ticket_messages(ticket_id);
            CREATE INDEX IF NOT EXISTS idx_ticket_messages_sent_at ON ticket_messages(sent_at);
            CREATE INDEX IF NOT EXISTS idx_ticket_messages_undelivered
                ON ticket_messages(is_staff, sent_to_discord);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Appends a message row. Staff-authored user messages publish on the feed.
    pub async fn append(&self, message: &TicketMessageRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO ticket_messages (id, ticket_id, author_id, author_username,
                author_avatar, content, is_staff, ping_user, sent_to_discord, kind,
                attachments, stickers, sent_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.ticket_id)
        .bind(message.author_id)
        .bind(&message.author_username)
        .bind(&message.author_avatar)
        .bind(&message.content)
        .bind(message.is_staff)
        .bind(message.ping_user)
        .bind(message.sent_to_discord)
        .bind(message.kind)
        .bind(serde_json::to_string(&message.attachments).unwrap_or_else(|_| "[]".to_string()))
        .bind(serde_json::to_string(&message.stickers).unwrap_or_else(|_| "[]".to_string()))
        .bind(message.sent_at)
        .execute(pool)
        .await?;

        info!(
            ticket_id = %message.ticket_id,
            message_id = %message.id,
            is_staff = message.is_staff,
            "Appended ticket message"
        );

        if message.is_staff && message.kind == crate::models::MessageKind::User {
            self.feed.publish_staff_message(message.clone());
        }
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<TicketMessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let message = sqlx::query_as::<_, TicketMessageRecord>(
            "SELECT * FROM ticket_messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(message)
    }

    /// Messages of one ticket, oldest first.
    pub async fn list_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Vec<TicketMessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages = sqlx::query_as::<_, TicketMessageRecord>(
            "SELECT * FROM ticket_messages WHERE ticket_id = ? ORDER BY sent_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Flips the delivery flag if it is still unset. Returns whether this call
    /// performed the flip; a second call for the same id reports `false`.
    pub async fn mark_delivered(&self, id: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query(
            "UPDATE ticket_messages SET sent_to_discord = 1 WHERE id = ? AND sent_to_discord = 0",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Staff messages still awaiting delivery, oldest first. Audit events are
    /// excluded; they are born delivered.
    pub async fn undelivered_staff(&self) -> Result<Vec<TicketMessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages = sqlx::query_as::<_, TicketMessageRecord>(
            r#"
            SELECT * FROM ticket_messages
            WHERE is_staff = 1 AND sent_to_discord = 0 AND kind != 'event'
            ORDER BY sent_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }
}
