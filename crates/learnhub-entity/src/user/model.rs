//! User profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// The durable profile of a platform user.
///
/// Only `last_active` and `is_online` are written by presence tracking;
/// every other field belongs to the profile subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Unique user identifier, also the presence key.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Subject issued by the identity provider.
    pub external_id: String,
    /// Full display name.
    pub name: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Platform role.
    pub role: UserRole,
    /// Academic department (optional).
    pub department: Option<String>,
    /// Last time a heartbeat was mirrored into the profile.
    pub last_active: Option<DateTime<Utc>>,
    /// Durable online flag, best-effort.
    #[serde(default)]
    pub is_online: bool,
    /// When the profile was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build a fresh profile with no presence history.
    pub fn new(external_id: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            name: name.into(),
            email: None,
            role,
            department: None,
            last_active: None,
            is_online: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-level presence update applied to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMirror {
    /// New `last_active` value.
    pub last_active: DateTime<Utc>,
    /// New `is_online` value.
    pub is_online: bool,
}

impl PresenceMirror {
    /// Whether this update may replace a profile currently holding
    /// `last_active`. Older updates never overwrite newer ones; on equal
    /// timestamps the offline write wins.
    pub fn supersedes(&self, last_active: Option<DateTime<Utc>>) -> bool {
        match last_active {
            None => true,
            Some(current) if current < self.last_active => true,
            Some(current) => current == self.last_active && !self.is_online,
        }
    }
}
