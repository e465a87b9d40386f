//! Binds the dashboard router and serves it until shutdown.

use anyhow::Result;
use tracing::info;

use crate::routes::routes;
use crate::state::AppState;

/// Serves the dashboard API on `addr` (e.g. `127.0.0.1:8080`).
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = routes(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Dashboard API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
