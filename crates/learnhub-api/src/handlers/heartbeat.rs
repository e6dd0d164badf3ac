//! Heartbeat handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{HeartbeatResponse, SuccessResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/heartbeat
pub async fn record(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    let ack = state.heartbeat_service.record_heartbeat(&auth).await?;
    Ok(Json(HeartbeatResponse {
        success: true,
        timestamp: ack.timestamp,
    }))
}

/// DELETE /api/heartbeat
pub async fn clear(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.heartbeat_service.clear_heartbeat(&auth).await?;
    Ok(Json(SuccessResponse { success: true }))
}
