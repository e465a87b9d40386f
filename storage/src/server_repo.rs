//! Server configuration repository, written by the `/setup` command.

use tracing::info;

use crate::error::StorageError;
use crate::models::ServerConfigRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ServerConfigRepository {
    pool_manager: SqlitePoolManager,
}

impl ServerConfigRepository {
    pub(crate) async fn new(pool_manager: SqlitePoolManager) -> Result<Self, sqlx::Error> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS server_configs (
                server_id INTEGER PRIMARY KEY,
                server_name TEXT NOT NULL,
                ticket_channel_id INTEGER NOT NULL,
                ticket_message_id INTEGER NOT NULL,
                access_roles TEXT NOT NULL DEFAULT '[]',
                tags TEXT NOT NULL DEFAULT '[]'
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts or replaces the configuration for a server. Re-running `/setup`
    /// points the server at the new panel.
    pub async fn upsert(&self, config: &ServerConfigRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO server_configs
                (server_id, server_name, ticket_channel_id, ticket_message_id, access_roles, tags)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(config.server_id)
        .bind(&config.server_name)
        .bind(config.ticket_channel_id)
        .bind(config.ticket_message_id)
        .bind(serde_json::to_string(&config.access_roles).unwrap_or_else(|_| "[]".to_string()))
        .bind(serde_json::to_string(&config.tags).unwrap_or_else(|_| "[]".to_string()))
        .execute(pool)
        .await?;

        info!(server_id = config.server_id, "Saved server config");
        Ok(())
    }

    pub async fn get(&self, server_id: i64) -> Result<Option<ServerConfigRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let config = sqlx::query_as::<_, ServerConfigRecord>(
            "SELECT * FROM server_configs WHERE server_id = ?",
        )
        .bind(server_id)
        .fetch_optional(pool)
        .await?;

        Ok(config)
    }
}
