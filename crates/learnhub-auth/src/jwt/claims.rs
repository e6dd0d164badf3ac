//! JWT claims structure used in access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_entity::user::UserRole;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity provider's stable user identifier.
    pub sub: String,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Display name for convenience.
    pub name: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token identifier.
    pub jti: Uuid,
    /// Token type. Only access tokens are accepted by the API.
    #[serde(default = "TokenType::access")]
    pub token_type: TokenType,
}

/// Distinguishes access tokens from other token kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived access token for API requests.
    Access,
    /// Long-lived refresh token, issued by the identity provider.
    Refresh,
}

impl TokenType {
    fn access() -> Self {
        Self::Access
    }
}

impl Claims {
    /// The external identity this token was issued for.
    pub fn subject(&self) -> &str {
        &self.sub
    }
}
