//! Presence aggregation for dashboards and rosters.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use learnhub_cache::PresenceStore;
use learnhub_core::error::AppError;
use learnhub_core::traits::clock::Clock;
use learnhub_database::{CohortStore, ProfileStore};
use learnhub_entity::presence::{HeartbeatRecord, PresenceStatus};
use learnhub_entity::user::UserRole;

use super::classifier::{StatusClassifier, format_relative, presence_order};

/// Relative-time label for users with no live record.
pub const UNKNOWN_LAST_SEEN: &str = "Unknown";

/// One user's classified presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    /// User identifier.
    pub user_id: Uuid,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Platform role.
    pub role: Option<UserRole>,
    /// Academic department.
    pub department: Option<String>,
    /// Classified status.
    pub status: PresenceStatus,
    /// Last heartbeat, epoch milliseconds. `None` when no record exists.
    pub last_seen: Option<i64>,
    /// Milliseconds since the last heartbeat. `None` when no record exists.
    pub age_ms: Option<i64>,
    /// Human-readable time since the last heartbeat.
    pub last_seen_relative: String,
}

impl PresenceEntry {
    fn from_record(record: HeartbeatRecord, now_ms: i64, classifier: &StatusClassifier) -> Self {
        let age_ms = record.age_ms(now_ms);
        Self {
            user_id: record.user_id,
            name: record.name,
            email: record.email,
            role: record.role,
            department: record.department,
            status: classifier.classify(age_ms),
            last_seen: Some(record.last_seen_epoch_ms),
            age_ms: Some(age_ms),
            last_seen_relative: format_relative(age_ms),
        }
    }

    fn absent(user_id: Uuid) -> Self {
        Self {
            user_id,
            name: None,
            email: None,
            role: None,
            department: None,
            status: PresenceStatus::Offline,
            last_seen: None,
            age_ms: None,
            last_seen_relative: UNKNOWN_LAST_SEEN.to_string(),
        }
    }

    fn sort_key(&self) -> (PresenceStatus, i64) {
        (self.status, self.age_ms.unwrap_or(i64::MAX))
    }
}

/// Per-status tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceCounts {
    /// Number of users considered.
    pub total: usize,
    /// Users classified online.
    pub online_count: usize,
    /// Users classified away.
    pub away_count: usize,
    /// Users classified offline.
    pub offline_count: usize,
}

impl PresenceCounts {
    /// Tally the statuses of `entries`.
    pub fn tally(entries: &[PresenceEntry]) -> Self {
        entries.iter().fold(
            Self {
                total: entries.len(),
                ..Self::default()
            },
            |mut counts, entry| {
                match entry.status {
                    PresenceStatus::Online => counts.online_count += 1,
                    PresenceStatus::Away => counts.away_count += 1,
                    PresenceStatus::Offline => counts.offline_count += 1,
                }
                counts
            },
        )
    }
}

/// Platform-wide presence snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsersView {
    /// Users, sorted, optionally filtered by status.
    pub users: Vec<PresenceEntry>,
    /// Tallies over every live record, before filtering.
    #[serde(flatten)]
    pub counts: PresenceCounts,
    /// Server time of the snapshot, epoch milliseconds.
    pub timestamp: i64,
}

/// Presence snapshot for one cohort.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortPresenceView {
    /// Cohort identifier.
    pub cohort_id: Uuid,
    /// Cohort display name.
    pub cohort_name: String,
    /// Every member, sorted.
    pub members: Vec<PresenceEntry>,
    /// Tallies over all members.
    #[serde(flatten)]
    pub counts: PresenceCounts,
    /// Server time of the snapshot, epoch milliseconds.
    pub timestamp: i64,
}

/// Read side of presence.
///
/// Never fails because of the presence store: an unreachable store yields
/// an empty scan, which reads as everyone offline.
#[derive(Debug, Clone)]
pub struct PresenceQueryService {
    store: PresenceStore,
    profiles: Arc<dyn ProfileStore>,
    cohorts: Arc<dyn CohortStore>,
    clock: Arc<dyn Clock>,
    classifier: StatusClassifier,
}

impl PresenceQueryService {
    /// Creates a new presence query service.
    pub fn new(
        store: PresenceStore,
        profiles: Arc<dyn ProfileStore>,
        cohorts: Arc<dyn CohortStore>,
        clock: Arc<dyn Clock>,
        classifier: StatusClassifier,
    ) -> Self {
        Self {
            store,
            profiles,
            cohorts,
            clock,
            classifier,
        }
    }

    /// Every user with a live record, classified and sorted.
    pub async fn list_active_users(&self) -> Vec<PresenceEntry> {
        let now_ms = self.clock.now_ms();
        self.classify_all(self.store.scan_all().await, now_ms)
    }

    /// Global roster with counts, optionally restricted to one status.
    pub async fn active_users_view(&self, filter: Option<PresenceStatus>) -> ActiveUsersView {
        let now_ms = self.clock.now_ms();
        let mut users = self.classify_all(self.store.scan_all().await, now_ms);
        let counts = PresenceCounts::tally(&users);

        if let Some(status) = filter {
            users.retain(|u| u.status == status);
        }

        debug!(total = counts.total, online = counts.online_count, "Built active users view");
        ActiveUsersView {
            users,
            counts,
            timestamp: now_ms,
        }
    }

    /// Roster for one cohort. Members without a live record are offline.
    pub async fn cohort_view(&self, cohort_id: Uuid) -> Result<CohortPresenceView, AppError> {
        let cohort = self
            .cohorts
            .find_by_id(cohort_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cohort not found"))?;

        let now_ms = self.clock.now_ms();
        let mut live: HashMap<Uuid, HeartbeatRecord> = self
            .store
            .scan_all()
            .await
            .into_iter()
            .filter(|r| cohort.has_member(r.user_id))
            .map(|r| (r.user_id, r))
            .collect();

        let mut members = Vec::with_capacity(cohort.member_ids.len());
        for member_id in &cohort.member_ids {
            let entry = match live.remove(member_id) {
                Some(record) => PresenceEntry::from_record(record, now_ms, &self.classifier),
                None => self.absent_member(*member_id).await,
            };
            members.push(entry);
        }
        members.sort_by(|a, b| presence_order(a.sort_key(), b.sort_key()));

        Ok(CohortPresenceView {
            cohort_id: cohort.id,
            cohort_name: cohort.name,
            counts: PresenceCounts::tally(&members),
            members,
            timestamp: now_ms,
        })
    }

    fn classify_all(&self, records: Vec<HeartbeatRecord>, now_ms: i64) -> Vec<PresenceEntry> {
        let mut entries: Vec<PresenceEntry> = records
            .into_iter()
            .map(|r| PresenceEntry::from_record(r, now_ms, &self.classifier))
            .collect();
        entries.sort_by(|a, b| presence_order(a.sort_key(), b.sort_key()));
        entries
    }

    /// Offline entry for a member, with display fields from the profile when available.
    async fn absent_member(&self, user_id: Uuid) -> PresenceEntry {
        let mut entry = PresenceEntry::absent(user_id);
        match self.profiles.find_by_id(user_id).await {
            Ok(Some(profile)) => {
                entry.name = Some(profile.name);
                entry.email = profile.email;
                entry.role = Some(profile.role);
                entry.department = profile.department;
            }
            Ok(None) => {}
            Err(e) => warn!(user_id = %user_id, error = %e, "Failed to load cohort member profile"),
        }
        entry
    }
}
