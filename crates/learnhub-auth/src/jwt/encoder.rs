//! JWT token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use learnhub_core::config::AuthConfig;
use learnhub_core::error::{AppError, ErrorKind};
use learnhub_entity::user::UserRole;

use super::claims::{Claims, TokenType};

/// Creates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: i64::try_from(config.jwt_access_ttl_minutes).unwrap_or(i64::MAX),
        }
    }

    /// Issues an access token for `subject` using the configured TTL.
    pub fn issue_access_token(
        &self,
        subject: &str,
        role: UserRole,
        name: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);
        self.issue_with_expiry(subject, role, name, now, exp)
    }

    /// Issues an access token with explicit issue and expiry times.
    pub fn issue_with_expiry(
        &self,
        subject: &str,
        role: UserRole,
        name: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            name: name.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::Access,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to encode access token", e)
        })?;

        Ok((token, expires_at))
    }
}
