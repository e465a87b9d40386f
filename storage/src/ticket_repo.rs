//! Ticket repository: persistence, queries, and invariant enforcement for tickets.
//!
//! Every write publishes on the [`ChangeFeed`] after commit. The
//! closed⟺closed_at invariant lives in [`TicketRepository::update`]: a
//! transition to `closed` stamps `closed_at`, a transition away clears it.

use chrono::Utc;
use tracing::info;

use crate::error::StorageError;
use crate::feed::{ChangeFeed, ChangeKind};
use crate::models::{Assignment, TicketQuery, TicketRecord, TicketStatus, TicketUpdate};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TicketRepository {
    pool_manager: SqlitePoolManager,
    feed: ChangeFeed,
}

impl TicketRepository {
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
            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                server_id INTEGER NOT NULL,
                thread_id INTEGER NOT NULL UNIQUE,
                opener_id INTEGER NOT NULL,
                opener_username TEXT NOT NULL,
                opener_avatar TEXT NOT NULL,
                title TEXT NOT NULL,
                status TEXT NOT NULL,
                priority TEXT NOT NULL,
                assigned_to TEXT,
                assigned_to_name TEXT,
                assigned_to_avatar TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                closed_at TEXT,
                last_message_at TEXT,
                is_read INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_tickets_server_id ON tickets(server_id);
            CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
            CREATE INDEX IF NOT EXISTS idx_tickets_assigned_to ON tickets(assigned_to);
            CREATE INDEX IF NOT EXISTS idx_tickets_created_at ON tickets(created_at);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts a new ticket and publishes an `Added` change.
    pub async fn create(&self, ticket: &TicketRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO tickets (id, server_id, thread_id, opener_id, opener_username,
                opener_avatar, title, status, priority, assigned_to, assigned_to_name,
                assigned_to_avatar, tags, created_at, closed_at, last_message_at, is_read)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&ticket.id)
        .bind(ticket.server_id)
        .bind(ticket.thread_id)
        .bind(ticket.opener_id)
        .bind(&ticket.opener_username)
        .bind(&ticket.opener_avatar)
        .bind(&ticket.title)
        .bind(ticket.status)
        .bind(ticket.priority)
        .bind(&ticket.assigned_to)
        .bind(&ticket.assigned_to_name)
        .bind(&ticket.assigned_to_avatar)
        .bind(serde_json::to_string(&ticket.tags).unwrap_or_else(|_| "[]".to_string()))
        .bind(ticket.created_at)
        .bind(ticket.closed_at)
        .bind(ticket.last_message_at)
        .bind(ticket.is_read)
        .execute(pool)
        .await?;

        info!(ticket_id = %ticket.id, thread_id = ticket.thread_id, "Created ticket");
        self.feed.publish_ticket(ChangeKind::Added, ticket.clone());
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<TicketRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let ticket = sqlx::query_as::<_, TicketRecord>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(ticket)
    }

    /// Resolves the ticket owning a chat thread, if any.
    pub async fn find_by_thread_id(
        &self,
        thread_id: i64,
    ) -> Result<Option<TicketRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let ticket =
            sqlx::query_as::<_, TicketRecord>("SELECT * FROM tickets WHERE thread_id = ?")
                .bind(thread_id)
                .fetch_optional(pool)
                .await?;

        Ok(ticket)
    }

    /// Lists tickets newest-created first, optionally filtered by server and status.
    pub async fn list(&self, query: &TicketQuery) -> Result<Vec<TicketRecord>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut sql = String::from("SELECT * FROM tickets WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(server_id) = query.server_id {
            sql.push_str(" AND server_id = ?");
            params.push(server_id.to_string());
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(status.as_str().to_string());
        }

        if let Some(assigned_to) = &query.assigned_to {
            sql.push_str(" AND assigned_to = ?");
            params.push(assigned_to.clone());
        }

        sql.push_str(" ORDER BY created_at DESC");

        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut query_builder = sqlx::query_as::<_, TicketRecord>(&sql);
        for param in &params {
            query_builder = query_builder.bind(param);
        }

        let tickets = query_builder.fetch_all(pool).await?;
        Ok(tickets)
    }

    /// Applies a partial update and publishes a `Modified` change with the new row.
    ///
    /// Status transitions keep `closed_at` consistent; assignment changes rewrite
    /// the id and both display snapshots together.
    pub async fn update(
        &self,
        id: &str,
        update: &TicketUpdate,
    ) -> Result<TicketRecord, StorageError> {
        let mut ticket = self
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("ticket {}", id)))?;

        if let Some(title) = &update.title {
            ticket.title = title.clone();
        }
        if let Some(status) = update.status {
            if status != ticket.status {
                ticket.closed_at = if status == TicketStatus::Closed {
                    Some(Utc::now())
                } else {
                    None
                };
            }
            ticket.status = status;
        }
        if let Some(priority) = update.priority {
            ticket.priority = priority;
        }
        if let Some(assignment) = &update.assignment {
            match assignment {
                Assignment::Assigned {
                    staff_id,
                    name,
                    avatar,
                } => {
                    ticket.assigned_to = Some(staff_id.clone());
                    ticket.assigned_to_name = Some(name.clone());
                    ticket.assigned_to_avatar = avatar.clone();
                }
                Assignment::Unassigned => {
                    ticket.assigned_to = None;
                    ticket.assigned_to_name = None;
                    ticket.assigned_to_avatar = None;
                }
            }
        }
        if let Some(tags) = &update.tags {
            ticket.tags = tags.clone();
        }
        if let Some(is_read) = update.is_read {
            ticket.is_read = is_read;
        }

        self.write_back(&ticket).await?;

        info!(ticket_id = %ticket.id, status = ticket.status.as_str(), "Updated ticket");
        self.feed
            .publish_ticket(ChangeKind::Modified, ticket.clone());
        Ok(ticket)
    }

    /// Bumps the freshness flags on a new inbound message: `last_message_at`
    /// to now, `is_read` to false. Publishes a `Modified` change.
    pub async fn touch_last_message(&self, id: &str) -> Result<TicketRecord, StorageError> {
        let mut ticket = self
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("ticket {}", id)))?;

        ticket.last_message_at = Some(Utc::now());
        ticket.is_read = false;

        self.write_back(&ticket).await?;
        self.feed
            .publish_ticket(ChangeKind::Modified, ticket.clone());
        Ok(ticket)
    }

    /// Deletes a ticket and publishes a `Removed` change carrying the last state.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let Some(ticket) = self.get(id).await? else {
            return Ok(false);
        };

        let pool = self.pool_manager.pool();
        sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        info!(ticket_id = %id, "Deleted ticket");
        self.feed.publish_ticket(ChangeKind::Removed, ticket);
        Ok(true)
    }

    async fn write_back(&self, ticket: &TicketRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            UPDATE tickets SET title = ?, status = ?, priority = ?, assigned_to = ?,
                assigned_to_name = ?, assigned_to_avatar = ?, tags = ?, closed_at = ?,
                last_message_at = ?, is_read = ?
            WHERE id = ?
            "#,
        )
        .bind(&ticket.title)
        .bind(ticket.status)
        .bind(ticket.priority)
        .bind(&ticket.assigned_to)
        .bind(&ticket.assigned_to_name)
        .bind(&ticket.assigned_to_avatar)
        .bind(serde_json::to_string(&ticket.tags).unwrap_or_else(|_| "[]".to_string()))
        .bind(ticket.closed_at)
        .bind(ticket.last_message_at)
        .bind(ticket.is_read)
        .bind(&ticket.id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
