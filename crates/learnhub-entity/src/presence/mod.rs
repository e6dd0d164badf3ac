//! Presence domain entities.

pub mod record;
pub mod status;

pub use record::HeartbeatRecord;
pub use status::PresenceStatus;
