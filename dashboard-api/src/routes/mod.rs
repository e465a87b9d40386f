//! Route table for the dashboard API.

mod messages;
mod tickets;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Builds the full dashboard router.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/tickets", get(tickets::list_tickets))
        .route(
            "/api/tickets/{id}",
            get(tickets::get_ticket).patch(tickets::update_ticket),
        )
        .route("/api/tickets/{id}/read", post(tickets::mark_read))
        .route(
            "/api/tickets/{id}/messages",
            get(messages::list_messages).post(messages::create_staff_message),
        )
        .with_state(state)
}
