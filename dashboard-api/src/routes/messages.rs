//! Message routes: conversation listing and staff replies.
//!
//! A staff reply is appended with `sent_to_discord = false`; that row is the
//! durable delivery intent the outbound sync renders into the thread.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use storage::TicketMessageRecord;

use crate::response::ApiResponse;
use crate::routes::tickets::ticket_not_found;
use crate::state::AppState;

/// GET /api/tickets/{id}/messages
///
/// The ticket's conversation, oldest first.
pub async fn list_messages(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.tickets().get(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ticket_not_found(&id),
        Err(e) => {
            error!(ticket_id = %id, error = %e, "Failed to fetch ticket");
            return storage_failure("Failed to fetch ticket");
        }
    }

    match state.store.messages().list_by_ticket(&id).await {
        Ok(messages) => (
            StatusCode::OK,
            Json(ApiResponse::success(messages, "Messages retrieved")),
        )
            .into_response(),
        Err(e) => {
            error!(ticket_id = %id, error = %e, "Failed to list messages");
            storage_failure("Failed to list messages")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStaffMessageRequest {
    pub author_id: i64,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub ping_user: bool,
}

/// POST /api/tickets/{id}/messages
///
/// Appends a staff reply. The chat-side render happens asynchronously via the
/// outbound sync; `sent_to_discord` on the returned record will read false
/// until that delivery completes.
pub async fn create_staff_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateStaffMessageRequest>,
) -> Response {
    if request.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Value>::error("Message content is required")),
        )
            .into_response();
    }

    match state.store.tickets().get(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return ticket_not_found(&id),
        Err(e) => {
            error!(ticket_id = %id, error = %e, "Failed to fetch ticket");
            return storage_failure("Failed to fetch ticket");
        }
    }

    let message = TicketMessageRecord::staff(
        &id,
        request.author_id,
        request.author_username,
        request.author_avatar,
        request.content,
        request.ping_user,
    );

    match state.store.messages().append(&message).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(message, "Message sent")),
        )
            .into_response(),
        Err(e) => {
            error!(ticket_id = %id, error = %e, "Failed to append staff message");
            storage_failure("Failed to send message")
        }
    }
}

fn storage_failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<Value>::error(message)),
    )
        .into_response()
}
