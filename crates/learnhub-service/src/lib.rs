//! # learnhub-service
//!
//! Presence use cases for LearnHub: heartbeat ingest with a best-effort
//! durable mirror, and the aggregation queries behind admin dashboards
//! and cohort rosters.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod presence;

pub use context::RequestContext;
pub use presence::{HeartbeatService, PresenceQueryService, StatusClassifier};
