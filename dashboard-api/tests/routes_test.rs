//! Route tests for the dashboard API, driven through the router with
//! tower's oneshot against a temp-file store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt; // not axum::ServiceExt

use dashboard_api::{routes::routes, AppState};
use storage::{TicketRecord, TicketStatus, TicketStore};
use tbot_core::ChatUser;

async fn test_state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite:{}/tickets.db", dir.path().display());
    let store = TicketStore::open(&url).await.expect("Failed to open store");
    (AppState::new(store), dir)
}

fn opener() -> ChatUser {
    ChatUser {
        id: 111,
        username: "alice".to_string(),
        avatar_url: "https://cdn.example/alice.png".to_string(),
    }
}

async fn seed_ticket(state: &AppState) -> TicketRecord {
    let ticket = TicketRecord::new(1, 42, &opener());
    state
        .store
        .tickets()
        .create(&ticket)
        .await
        .expect("seed ticket");
    ticket
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn test_list_tickets_filters_by_status() {
    let (state, _dir) = test_state().await;
    seed_ticket(&state).await;

    let app = routes(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/tickets?status=open")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/tickets?status=closed")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_ticket_found_and_missing() {
    let (state, _dir) = test_state().await;
    let ticket = seed_ticket(&state).await;

    let app = routes(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}", ticket.id))
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], ticket.id.as_str());
    assert_eq!(body["data"]["status"], "open");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/tickets/missing")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_ticket_closes_and_stamps_closed_at() {
    let (state, _dir) = test_state().await;
    let ticket = seed_ticket(&state).await;

    let app = routes(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}", ticket.id))
                .method("PATCH")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status": "closed"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "closed");
    assert!(!body["data"]["closed_at"].is_null());

    let stored = state
        .store
        .tickets()
        .get(&ticket.id)
        .await
        .expect("get")
        .expect("ticket");
    assert_eq!(stored.status, TicketStatus::Closed);
}

#[tokio::test]
async fn test_patch_ticket_assignment_payloads() {
    let (state, _dir) = test_state().await;
    let ticket = seed_ticket(&state).await;

    let app = routes(state);

    let assign = r#"{"assignment": {"assigned": {"staff_id": "U1", "name": "Alice", "avatar": null}}}"#;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}", ticket.id))
                .method("PATCH")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(assign))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["assigned_to"], "U1");
    assert_eq!(body["data"]["assigned_to_name"], "Alice");

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}", ticket.id))
                .method("PATCH")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"assignment": "unassigned"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"]["assigned_to"].is_null());
    assert!(body["data"]["assigned_to_name"].is_null());
}

#[tokio::test]
async fn test_staff_message_round_trip() {
    let (state, _dir) = test_state().await;
    let ticket = seed_ticket(&state).await;

    let app = routes(state.clone());

    let payload = r#"{
        "author_id": 999,
        "author_username": "staffer",
        "content": "we are on it",
        "ping_user": true
    }"#;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}/messages", ticket.id))
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_staff"], true);
    // Undelivered until the outbound sync renders it.
    assert_eq!(body["data"]["sent_to_discord"], false);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}/messages", ticket.id))
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let messages = body["data"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "we are on it");
    assert_eq!(messages[0]["ping_user"], true);
}

#[tokio::test]
async fn test_staff_message_requires_content() {
    let (state, _dir) = test_state().await;
    let ticket = seed_ticket(&state).await;

    let app = routes(state);

    let payload = r#"{"author_id": 999, "author_username": "staffer", "content": "  "}"#;
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}/messages", ticket.id))
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_read_clears_unread_flag() {
    let (state, _dir) = test_state().await;
    let ticket = seed_ticket(&state).await;
    state
        .store
        .tickets()
        .touch_last_message(&ticket.id)
        .await
        .expect("touch");

    let app = routes(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tickets/{}/read", ticket.id))
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_read"], true);
}
