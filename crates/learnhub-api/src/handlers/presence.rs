//! Presence query handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use learnhub_service::presence::{ActiveUsersView, CohortPresenceView};

use crate::dto::request::ActiveUsersQuery;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/presence/active (admin)
pub async fn active_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ActiveUsersQuery>,
) -> Result<Json<ActiveUsersView>, ApiError> {
    require_admin(&auth)?;
    let filter = query.status_filter()?;
    Ok(Json(state.presence_service.active_users_view(filter).await))
}

/// GET /api/presence/cohort/{cohortId}
pub async fn cohort(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(cohort_id): Path<String>,
) -> Result<Json<CohortPresenceView>, ApiError> {
    let cohort_id = parse_uuid(&cohort_id)?;
    Ok(Json(state.presence_service.cohort_view(cohort_id).await?))
}
