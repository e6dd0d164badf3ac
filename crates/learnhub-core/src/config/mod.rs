//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so an empty file is a
//! valid development configuration.

pub mod app;
pub mod auth;
pub mod cache;
pub mod client;
pub mod database;
pub mod logging;
pub mod presence;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::{CacheConfig, RedisCacheConfig};
pub use self::client::ClientConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::presence::PresenceConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "LEARNHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Durable profile/cohort store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Presence store backend settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Presence classification and store tuning.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Client heartbeat driver settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `LEARNHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints after deserialization.
    pub fn validate(&self) -> Result<(), AppError> {
        self.client.validate()
    }

    /// Load configuration from a single explicit file, still honouring
    /// `LEARNHUB__` environment overrides.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to read '{path}': {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
