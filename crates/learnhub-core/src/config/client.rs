//! Client heartbeat driver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for the per-session heartbeat driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the LearnHub API, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Heartbeat cadence while active, in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Inactivity after which heartbeats are suppressed, in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Timeout for a single heartbeat request, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl ClientConfig {
    /// Heartbeat cadence as a `Duration`, never shorter than one second.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds.max(1))
    }

    /// Reject settings the driver cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.heartbeat_interval_seconds == 0 {
            return Err(AppError::configuration(
                "client.heartbeat_interval_seconds must be at least 1",
            ));
        }
        Ok(())
    }

    /// Inactivity window as a `Duration`.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            idle_timeout_seconds: default_idle_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_heartbeat_interval() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    120
}

fn default_request_timeout() -> u64 {
    3_000
}
