//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use learnhub_core::config::AuthConfig;
use learnhub_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Every failure maps to an authentication error.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?
            .claims;

        if claims.token_type != TokenType::Access {
            return Err(AppError::authentication(
                "Invalid token type: expected access token",
            ));
        }
        if claims.subject().trim().is_empty() {
            return Err(AppError::authentication("Token has an empty subject"));
        }

        Ok(claims)
    }
}
