//! # learnhub-api
//!
//! HTTP API layer for LearnHub presence built on Axum.
//!
//! Provides the heartbeat and presence endpoints, the bearer-token
//! extractor, role guards, CORS and request logging, and the mapping from
//! [`AppError`](learnhub_core::AppError) to JSON error bodies.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
