//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use learnhub_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API's auth extractor from verified token claims and passed
/// into service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Identity-provider subject from the token.
    pub subject: String,
    /// The caller's role at the time the token was issued.
    pub role: UserRole,
    /// Display name from the token.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(subject: impl Into<String>, role: UserRole, name: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role,
            name: name.into(),
            request_time: Utc::now(),
        }
    }
}
