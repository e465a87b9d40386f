//! Shared helpers for sync integration tests.

pub mod mock_gateway;

use storage::TicketStore;
use tbot_core::ChatUser;

/// Opens a fresh store backed by a temp-dir SQLite file. Keep the dir alive
/// for the duration of the test.
#[allow(dead_code)]
pub async fn open_store() -> (TicketStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}/tickets.db", dir.path().display());
    let store = TicketStore::open(&url).await.expect("Failed to open store");
    (store, dir)
}

#[allow(dead_code)]
pub fn opener() -> ChatUser {
    ChatUser {
        id: 111,
        username: "alice".to_string(),
        avatar_url: "https://cdn.example/alice.png".to_string(),
    }
}

#[allow(dead_code)]
pub fn other_user() -> ChatUser {
    ChatUser {
        id: 222,
        username: "bob".to_string(),
        avatar_url: "https://cdn.example/bob.png".to_string(),
    }
}
