//! Status classification and relative-time formatting.
//!
//! Everything here is a pure function of a heartbeat age in milliseconds.

use std::cmp::Ordering;

use learnhub_core::config::PresenceConfig;
use learnhub_entity::presence::PresenceStatus;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Maps heartbeat age to a [`PresenceStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClassifier {
    online_threshold_ms: i64,
    away_threshold_ms: i64,
}

impl StatusClassifier {
    /// Build a classifier with explicit inclusive thresholds.
    pub fn new(online_threshold_ms: i64, away_threshold_ms: i64) -> Self {
        Self {
            online_threshold_ms,
            away_threshold_ms: away_threshold_ms.max(online_threshold_ms),
        }
    }

    /// Build a classifier from presence configuration.
    pub fn from_config(config: &PresenceConfig) -> Self {
        Self::new(config.online_threshold_ms, config.away_threshold_ms)
    }

    /// Classify an age. Negative ages (client ahead of server) count as zero.
    pub fn classify(&self, age_ms: i64) -> PresenceStatus {
        let age_ms = age_ms.max(0);
        if age_ms <= self.online_threshold_ms {
            PresenceStatus::Online
        } else if age_ms <= self.away_threshold_ms {
            PresenceStatus::Away
        } else {
            PresenceStatus::Offline
        }
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::from_config(&PresenceConfig::default())
    }
}

/// Human-readable "time since" for an age in milliseconds.
pub fn format_relative(age_ms: i64) -> String {
    let age_ms = age_ms.max(0);
    if age_ms < 5 * SECOND_MS {
        "Just now".to_string()
    } else if age_ms < MINUTE_MS {
        format!("{}s ago", age_ms / SECOND_MS)
    } else if age_ms < HOUR_MS {
        format!("{}m ago", age_ms / MINUTE_MS)
    } else if age_ms < DAY_MS {
        format!("{}h ago", age_ms / HOUR_MS)
    } else {
        format!("{}d ago", age_ms / DAY_MS)
    }
}

/// Roster ordering: higher status priority first, then most recent first.
pub fn presence_order(a: (PresenceStatus, i64), b: (PresenceStatus, i64)) -> Ordering {
    b.0.priority()
        .cmp(&a.0.priority())
        .then_with(|| a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let c = StatusClassifier::default();
        assert_eq!(c.classify(0), PresenceStatus::Online);
        assert_eq!(c.classify(5_000), PresenceStatus::Online);
        assert_eq!(c.classify(5_001), PresenceStatus::Away);
        assert_eq!(c.classify(60_000), PresenceStatus::Away);
        assert_eq!(c.classify(60_001), PresenceStatus::Offline);
        assert_eq!(c.classify(70_000), PresenceStatus::Offline);
    }

    #[test]
    fn test_negative_age_is_online() {
        assert_eq!(
            StatusClassifier::default().classify(-30_000),
            PresenceStatus::Online
        );
    }

    #[test]
    fn test_format_relative_tiers() {
        assert_eq!(format_relative(-10), "Just now");
        assert_eq!(format_relative(4_999), "Just now");
        assert_eq!(format_relative(5_000), "5s ago");
        assert_eq!(format_relative(59_999), "59s ago");
        assert_eq!(format_relative(60_000), "1m ago");
        assert_eq!(format_relative(3_599_999), "59m ago");
        assert_eq!(format_relative(3_600_000), "1h ago");
        assert_eq!(format_relative(86_399_999), "23h ago");
        assert_eq!(format_relative(86_400_000), "1d ago");
        assert_eq!(format_relative(3 * 86_400_000 + 5), "3d ago");
    }

    #[test]
    fn test_presence_order() {
        let mut rows = vec![
            (PresenceStatus::Offline, 90_000),
            (PresenceStatus::Online, 4_000),
            (PresenceStatus::Away, 20_000),
            (PresenceStatus::Online, 1_000),
            (PresenceStatus::Away, 6_000),
        ];
        rows.sort_by(|a, b| presence_order(*a, *b));
        assert_eq!(
            rows,
            vec![
                (PresenceStatus::Online, 1_000),
                (PresenceStatus::Online, 4_000),
                (PresenceStatus::Away, 6_000),
                (PresenceStatus::Away, 20_000),
                (PresenceStatus::Offline, 90_000),
            ]
        );
    }
}
