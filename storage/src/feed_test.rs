//! Unit tests for the change feed: which writes emit, and with which kind.

use tbot_core::ChatUser;
use tokio::sync::broadcast::error::TryRecvError;

use crate::feed::ChangeKind;
use crate::models::{TicketMessageRecord, TicketRecord, TicketStatus, TicketUpdate};
use crate::store::TicketStore;

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
async fn test_ticket_writes_emit_in_commit_order() {
    let (store, _dir) = open_store().await;
    let mut changes = store.subscribe_tickets();

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");
    store
        .tickets()
        .update(&ticket.id, &TicketUpdate::status(TicketStatus::Resolved))
        .await
        .expect("update");
    store.tickets().delete(&ticket.id).await.expect("delete");

    let added = changes.try_recv().expect("added event");
    assert_eq!(added.kind, ChangeKind::Added);
    assert_eq!(added.ticket.id, ticket.id);

    let modified = changes.try_recv().expect("modified event");
    assert_eq!(modified.kind, ChangeKind::Modified);
    assert_eq!(modified.ticket.status, TicketStatus::Resolved);

    let removed = changes.try_recv().expect("removed event");
    assert_eq!(removed.kind, ChangeKind::Removed);
}

#[tokio::test]
async fn test_only_staff_user_messages_emit() {
    let (store, _dir) = open_store().await;

    let ticket = TicketRecord::new(1, 42, &opener());
    store.tickets().create(&ticket).await.expect("create");

    let mut staff_changes = store.subscribe_staff_messages();

    let inbound = TicketMessageRecord::inbound(
        &ticket.id,
        &opener(),
        "hello".to_string(),
        Vec::new(),
        Vec::new(),
    );
    store.messages().append(&inbound).await.expect("append");

    let event = TicketMessageRecord::event(&ticket.id, "Ticket assigned to Alice.".to_string());
    store.messages().append(&event).await.expect("append");

    let staff = TicketMessageRecord::staff(
        &ticket.id,
        999,
        "staffer".to_string(),
        None,
        "we are on it".to_string(),
        true,
    );
    store.messages().append(&staff).await.expect("append");

    let change = staff_changes.try_recv().expect("staff message event");
    assert_eq!(change.ticket_id, ticket.id);
    assert_eq!(change.message.id, staff.id);
    assert!(change.message.ping_user);

    // Inbound and event rows produced nothing further.
    assert!(matches!(staff_changes.try_recv(), Err(TryRecvError::Empty)));
}
