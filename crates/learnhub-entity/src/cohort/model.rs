//! Cohort entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, externally managed group of users such as a course roster.
///
/// Presence only reads cohorts; membership is owned by the course
/// subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    /// Cohort identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// User IDs of the members.
    pub member_ids: Vec<Uuid>,
}

impl Cohort {
    /// Check whether a user belongs to this cohort.
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.member_ids.contains(&user_id)
    }
}
