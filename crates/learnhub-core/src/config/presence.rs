//! Presence tracking configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Presence store and classifier tuning.
///
/// The thresholds are inclusive upper bounds: an age equal to
/// `online_threshold_ms` is still online.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Lifetime of a heartbeat record without refresh, in seconds.
    #[serde(default = "default_record_ttl")]
    pub record_ttl_seconds: u64,
    /// Maximum age (ms) still classified as online.
    #[serde(default = "default_online_threshold")]
    pub online_threshold_ms: i64,
    /// Maximum age (ms) still classified as away.
    #[serde(default = "default_away_threshold")]
    pub away_threshold_ms: i64,
    /// Upper bound for any single presence store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// Number of keys fetched per `MGET` during a scan.
    #[serde(default = "default_scan_batch_size")]
    pub scan_batch_size: usize,
    /// Minimum spacing between durable `last_active` writes for one user, in seconds.
    #[serde(default = "default_mirror_interval")]
    pub mirror_interval_seconds: u64,
    /// Upper bound for a durable mirror write, in milliseconds.
    #[serde(default = "default_mirror_timeout")]
    pub mirror_timeout_ms: u64,
}

impl PresenceConfig {
    /// Record TTL as a `Duration`.
    pub fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.record_ttl_seconds)
    }

    /// Store call timeout as a `Duration`.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Mirror write timeout as a `Duration`.
    pub fn mirror_timeout(&self) -> Duration {
        Duration::from_millis(self.mirror_timeout_ms)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            record_ttl_seconds: default_record_ttl(),
            online_threshold_ms: default_online_threshold(),
            away_threshold_ms: default_away_threshold(),
            store_timeout_ms: default_store_timeout(),
            scan_batch_size: default_scan_batch_size(),
            mirror_interval_seconds: default_mirror_interval(),
            mirror_timeout_ms: default_mirror_timeout(),
        }
    }
}

fn default_record_ttl() -> u64 {
    300
}

fn default_online_threshold() -> i64 {
    5_000
}

fn default_away_threshold() -> i64 {
    60_000
}

fn default_store_timeout() -> u64 {
    500
}

fn default_scan_batch_size() -> usize {
    100
}

fn default_mirror_interval() -> u64 {
    60
}

fn default_mirror_timeout() -> u64 {
    2_000
}
