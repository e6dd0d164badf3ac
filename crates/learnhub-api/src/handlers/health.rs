//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Always answers 200; a degraded presence store is reported in the body.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let available = state.presence_store.is_available().await;
    let status = if available { "ok" } else { "degraded" };

    let database = match &state.stores.pool {
        None => "memory",
        Some(pool) if pool.is_reachable(state.config.presence.store_timeout()).await => {
            "connected"
        }
        Some(_) => "unavailable",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        presence_store: if available { "connected" } else { "unavailable" }.to_string(),
        database: database.to_string(),
    }))
}
