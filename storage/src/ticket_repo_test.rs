//! Unit tests for TicketRepository.
//!
//! Covers creation defaults, thread lookup, the closed/closed_at invariant,
//! assignment snapshots, freshness flags, and listing filters.

use tbot_core::ChatUser;

use crate::models::{Assignment, TicketQuery, TicketRecord, TicketStatus, TicketUpdate};
use crate::store::TicketStore;
use crate::StorageError;

async fn open_store() -> (TicketStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}/tickets.db", dir.path().display());
    let store = TicketStore::open(&url).await.expect("Failed to open store");
    (store, dir)
}

fn opener() -> ChatUser {
    ChatUser {
        id: 111,
        username: "alice".to_string(),
        avatar_url: "https://cdn.example/alice.png".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_get_defaults() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");

    let loaded = store
        .tickets()
        .get(&ticket.id)
        .await
        .expect("get")
        .expect("ticket should exist");

    assert_eq!(loaded.id, ticket.id);
    assert_eq!(loaded.server_id, 1);
    assert_eq!(loaded.thread_id, 42);
    assert_eq!(loaded.status, TicketStatus::Open);
    assert_eq!(loaded.priority.as_str(), "low");
    assert!(loaded.assigned_to.is_none());
    assert_eq!(loaded.title, "Ticket by alice");
    assert!(loaded.closed_at.is_none());
    assert!(loaded.is_read);
    assert!(loaded.tags.is_empty());
}

#[tokio::test]
async fn test_find_by_thread_id() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");

    let found = store
        .tickets()
        .find_by_thread_id(42)
        .await
        .expect("query");
    assert_eq!(found.map(|t| t.id), Some(ticket.id));

    let missing = store
        .tickets()
        .find_by_thread_id(999)
        .await
        .expect("query");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_thread_id_is_unique() {
    let (store, _dir) = open_store().await;

    let first = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&first).await.expect("create");

    let duplicate = TicketRecord::new(1, 42, &opener());
    let err = store.tickets().create(&duplicate).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_close_sets_closed_at_and_reopen_clears_it() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");

    let closed = store
        .tickets()
        .update(&ticket.id, &TicketUpdate::status(TicketStatus::Closed))
        .await
        .expect("close");
    assert_eq!(closed.status, TicketStatus::Closed);
    assert!(closed.closed_at.is_some());

    // Re-applying the same status is a no-op on closed_at.
    let still_closed = store
        .tickets()
        .update(&ticket.id, &TicketUpdate::status(TicketStatus::Closed))
        .await
        .expect("close again");
    assert_eq!(still_closed.closed_at, closed.closed_at);

    let reopened = store
        .tickets()
        .update(&ticket.id, &TicketUpdate::status(TicketStatus::Open))
        .await
        .expect("reopen");
    assert_eq!(reopened.status, TicketStatus::Open);
    assert!(reopened.closed_at.is_none());

    let resolved = store
        .tickets()
        .update(&ticket.id, &TicketUpdate::status(TicketStatus::Resolved))
        .await
        .expect("resolve");
    assert!(resolved.closed_at.is_none());
}

#[tokio::test]
async fn test_assignment_rewrites_all_snapshots() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");

    let update = TicketUpdate {
        assignment: Some(Assignment::Assigned {
            staff_id: "U1".to_string(),
            name: "Alice".to_string(),
            avatar: Some("https://cdn.example/staff.png".to_string()),
        }),
        ..TicketUpdate::default()
    };
    let assigned = store.tickets().update(&ticket.id, &update).await.expect("assign");
    assert_eq!(assigned.assigned_to.as_deref(), Some("U1"));
    assert_eq!(assigned.assigned_to_name.as_deref(), Some("Alice"));
    assert!(assigned.assigned_to_avatar.is_some());

    let update = TicketUpdate {
        assignment: Some(Assignment::Unassigned),
        ..TicketUpdate::default()
    };
    let unassigned = store.tickets().update(&ticket.id, &update).await.expect("unassign");
    assert!(unassigned.assigned_to.is_none());
    assert!(unassigned.assigned_to_name.is_none());
    assert!(unassigned.assigned_to_avatar.is_none());
}

#[tokio::test]
async fn test_touch_last_message_marks_unread() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");

    let touched = store
        .tickets()
        .touch_last_message(&ticket.id)
        .await
        .expect("touch");
    assert!(touched.last_message_at.is_some());
    assert!(!touched.is_read);
}

#[tokio::test]
async fn test_list_filters_by_server_and_status() {
    let (store, _dir) = open_store().await;

    for (server_id, thread_id) in [(1, 10), (1, 11), (2, 20)] {
        let ticket = TicketRecord::new(server_id, thread_id, &opener());
        store.tickets().create(&ticket).await.expect("create");
    }

    let server_one = store
        .tickets()
        .list(&TicketQuery {
            server_id: Some(1),
            ..TicketQuery::default()
        })
        .await
        .expect("list");
    assert_eq!(server_one.len(), 2);

    let closed = store
        .tickets()
        .list(&TicketQuery {
            status: Some(TicketStatus::Closed),
            ..TicketQuery::default()
        })
        .await
        .expect("list");
    assert!(closed.is_empty());
}

#[tokio::test]
async fn test_list_filters_by_assignee() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 10, &opener());
    store.tickets().create(&ticket).await.expect("create");
    let unassigned = TicketRecord::new(1, 11, &opener());
    store.tickets().create(&unassigned).await.expect("create");

    store
        .tickets()
        .update(
            &ticket.id,
            &TicketUpdate {
                assignment: Some(Assignment::Assigned {
                    staff_id: "U1".to_string(),
                    name: "Alice".to_string(),
                    avatar: None,
                }),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("assign");

    let mine = store
        .tickets()
        .list(&TicketQuery {
            assigned_to: Some("U1".to_string()),
            ..TicketQuery::default()
        })
        .await
        .expect("list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, ticket.id);
}

#[tokio::test]
async fn test_update_missing_ticket_is_not_found() {
    let (store, _dir) = open_store().await;

    let err = store
        .tickets()
        .update("missing", &TicketUpdate::status(TicketStatus::Closed))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}
