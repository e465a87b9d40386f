//! Server configuration written by the `/setup` command.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServerConfigRecord {
    pub server_id: i64,
    pub server_name: String,
    /// Channel carrying the open-ticket panel; new ticket threads are created under it.
    pub ticket_channel_id: i64,
    pub ticket_message_id: i64,
    #[sqlx(json)]
    pub access_roles: Vec<String>,
    #[sqlx(json)]
    pub tags: Vec<String>,
}
