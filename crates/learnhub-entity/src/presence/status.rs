//! Presence status derived from heartbeat age.

use serde::{Deserialize, Serialize};

/// Classified presence of a user. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Heartbeat within the online threshold.
    Online,
    /// Heartbeat within the away threshold.
    Away,
    /// No recent heartbeat, or no record at all.
    Offline,
}

impl PresenceStatus {
    /// Sort priority: higher sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Online => 3,
            Self::Away => 2,
            Self::Offline => 1,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = learnhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "offline" => Ok(Self::Offline),
            _ => Err(learnhub_core::AppError::validation(format!(
                "Invalid presence status: '{s}'"
            ))),
        }
    }
}
