//! Request DTOs.

use serde::Deserialize;

use learnhub_core::error::AppError;
use learnhub_entity::presence::PresenceStatus;

/// Query string for `GET /api/presence/active`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveUsersQuery {
    /// Optional status filter: `online`, `away`, or `offline`.
    pub status: Option<String>,
}

impl ActiveUsersQuery {
    /// Parse the status filter. Blank values mean no filter.
    pub fn status_filter(&self) -> Result<Option<PresenceStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}
