//! HTTP request handlers.

pub mod health;
pub mod heartbeat;
pub mod presence;
