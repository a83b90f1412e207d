//! Transfer coordination and download token configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest configurable token or URL lifetime, in minutes (7 days).
pub const MAX_LIFETIME_MINUTES: u64 = 7 * 24 * 60;

/// Timeouts, retention, and token lifetimes used by the transfer layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Upper bound for every single object store or metadata store call.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_seconds: u64,
    /// Default retention of a freshly uploaded file, in hours.
    #[serde(default = "default_retention")]
    pub retention_hours: u64,
    /// Fixed lifetime of a one-time token, regardless of requested duration.
    #[serde(default = "default_one_time_minutes")]
    pub one_time_token_minutes: u64,
    /// Lifetime used when a time-limited token is requested without a duration.
    #[serde(default = "default_token_minutes")]
    pub default_token_minutes: u64,
    /// Lifetime of the download URL handed out after token validation.
    #[serde(default = "default_download_url_minutes")]
    pub download_url_minutes: u64,
    /// Attempts for the compensating blob delete after a failed metadata insert.
    #[serde(default = "default_compensation_attempts")]
    pub compensation_attempts: u32,
    /// Pause between compensation attempts, in milliseconds.
    #[serde(default = "default_compensation_backoff")]
    pub compensation_backoff_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            operation_timeout_seconds: default_operation_timeout(),
            retention_hours: default_retention(),
            one_time_token_minutes: default_one_time_minutes(),
            default_token_minutes: default_token_minutes(),
            download_url_minutes: default_download_url_minutes(),
            compensation_attempts: default_compensation_attempts(),
            compensation_backoff_ms: default_compensation_backoff(),
        }
    }
}

impl TransferConfig {
    /// Per-call timeout for external I/O.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_seconds)
    }

    /// Retention applied to new uploads.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 3600)
    }

    /// Fixed ceiling for one-time tokens.
    pub fn one_time_token_ttl(&self) -> Duration {
        Duration::from_secs(self.one_time_token_minutes * 60)
    }

    /// Fallback lifetime for time-limited tokens.
    pub fn default_token_ttl(&self) -> Duration {
        Duration::from_secs(self.default_token_minutes * 60)
    }

    /// Lifetime of validated download URLs.
    pub fn download_url_ttl(&self) -> Duration {
        Duration::from_secs(self.download_url_minutes * 60)
    }

    /// Pause between compensation attempts.
    pub fn compensation_backoff(&self) -> Duration {
        Duration::from_millis(self.compensation_backoff_ms)
    }
}

fn default_operation_timeout() -> u64 {
    10
}

fn default_retention() -> u64 {
    24
}

fn default_one_time_minutes() -> u64 {
    30
}

fn default_token_minutes() -> u64 {
    30
}

fn default_download_url_minutes() -> u64 {
    10
}

fn default_compensation_attempts() -> u32 {
    1
}

fn default_compensation_backoff() -> u64 {
    500
}
