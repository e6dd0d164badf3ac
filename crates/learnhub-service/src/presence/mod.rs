//! Presence tracking: classification, ingest, and aggregation.

pub mod classifier;
pub mod heartbeat;
pub mod query;

pub use classifier::StatusClassifier;
pub use heartbeat::{HeartbeatAck, HeartbeatService};
pub use query::{
    ActiveUsersView, CohortPresenceView, PresenceCounts, PresenceEntry, PresenceQueryService,
};
