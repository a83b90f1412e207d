//! Download token type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use secureshare_core::AppError;

/// How a download token may be used.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "token_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    /// Valid for a single successful validation, then cleared.
    OneTime,
    /// Valid for repeated use until its expiry instant.
    #[default]
    TimeLimited,
}

impl TokenType {
    /// Return the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::TimeLimited => "time-limited",
        }
    }

    /// Whether a successful validation consumes the token.
    pub fn is_single_use(&self) -> bool {
        matches!(self, Self::OneTime)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one-time" => Ok(Self::OneTime),
            "time-limited" => Ok(Self::TimeLimited),
            _ => Err(AppError::invalid_input(format!(
                "Invalid token type: '{s}'. Expected one of: one-time, time-limited"
            ))),
        }
    }
}
