//! Heartbeat record stored in the presence store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{UserProfile, UserRole};

/// One user's liveness record, keyed by `user_id`.
///
/// Display fields are snapshotted from the profile at write time and may
/// lag behind profile edits for up to one TTL window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRecord {
    /// User identifier.
    pub user_id: Uuid,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Platform role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Academic department.
    #[serde(default)]
    pub department: Option<String>,
    /// Server time of the most recent heartbeat, epoch milliseconds.
    pub last_seen_epoch_ms: i64,
}

impl HeartbeatRecord {
    /// Snapshot a profile at `now_ms`.
    pub fn from_profile(profile: &UserProfile, now_ms: i64) -> Self {
        Self {
            user_id: profile.id,
            name: Some(profile.name.clone()),
            email: profile.email.clone(),
            role: Some(profile.role),
            department: profile.department.clone(),
            last_seen_epoch_ms: now_ms,
        }
    }

    /// Milliseconds since the last heartbeat, clamped at zero.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.last_seen_epoch_ms).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_profile_snapshots_display_fields() {
        let mut profile = UserProfile::new("auth0|ada", "Ada Lovelace", UserRole::Student);
        profile.department = Some("Mathematics".to_string());

        let record = HeartbeatRecord::from_profile(&profile, 42);
        assert_eq!(record.user_id, profile.id);
        assert_eq!(record.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(record.department.as_deref(), Some("Mathematics"));
        assert_eq!(record.role, Some(UserRole::Student));
        assert_eq!(record.last_seen_epoch_ms, 42);
    }

    #[test]
    fn test_age_is_clamped_when_clock_moves_backwards() {
        let record = HeartbeatRecord {
            user_id: Uuid::nil(),
            name: None,
            email: None,
            role: None,
            department: None,
            last_seen_epoch_ms: 10_000,
        };
        assert_eq!(record.age_ms(12_500), 2_500);
        assert_eq!(record.age_ms(9_000), 0);
    }

    #[test]
    fn test_missing_display_fields_deserialize() {
        let json = r#"{"userId":"00000000-0000-0000-0000-000000000000","lastSeenEpochMs":7}"#;
        let record: HeartbeatRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.last_seen_epoch_ms, 7);
        assert!(record.name.is_none());
    }
}
