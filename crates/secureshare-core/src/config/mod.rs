//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod storage;
pub mod transfer;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::{S3StorageConfig, StorageConfig};
pub use self::transfer::{MAX_LIFETIME_MINUTES, TransferConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Transfer coordination and token lifetimes.
    #[serde(default)]
    pub transfer: TransferConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SECURESHARE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SECURESHARE")
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

    /// Reject settings the transfer layer cannot operate with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage.bucket.trim().is_empty() {
            return Err(AppError::configuration("storage.bucket must not be empty"));
        }
        if self.transfer.operation_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "transfer.operation_timeout_seconds must be positive",
            ));
        }
        if self.transfer.compensation_attempts == 0 {
            return Err(AppError::configuration(
                "transfer.compensation_attempts must be at least 1",
            ));
        }
        let lifetimes = [
            ("one_time_token_minutes", self.transfer.one_time_token_minutes),
            ("default_token_minutes", self.transfer.default_token_minutes),
            ("download_url_minutes", self.transfer.download_url_minutes),
        ];
        for (name, minutes) in lifetimes {
            if minutes == 0 || minutes > MAX_LIFETIME_MINUTES {
                return Err(AppError::configuration(format!(
                    "transfer.{name} must be between 1 and {MAX_LIFETIME_MINUTES}"
                )));
            }
        }
        Ok(())
    }
}
