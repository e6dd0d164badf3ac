//! Application builder: wires router, middleware, and state into an Axum app.

use std::future::Future;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    build_router(state)
        .layer(build_compression_layer())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the app until `shutdown` resolves, then drains in-flight requests.
pub async fn run_server<F>(state: AppState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.bind_address();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;

    info!(address = %addr, "LearnHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))
}
