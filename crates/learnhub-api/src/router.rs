//! Route definitions for the LearnHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(heartbeat_routes())
        .merge(presence_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness signals from client sessions
fn heartbeat_routes() -> Router<AppState> {
    Router::new().route(
        "/heartbeat",
        post(handlers::heartbeat::record).delete(handlers::heartbeat::clear),
    )
}

/// Presence rosters
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/presence/active", get(handlers::presence::active_users))
        .route(
            "/presence/cohort/{cohort_id}",
            get(handlers::presence::cohort),
        )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
