//! Download token generation.

use secureshare_core::error::{AppError, ErrorKind};
use secureshare_core::result::AppResult;

/// Number of random bytes per token. Hex encoding doubles the length.
pub const TOKEN_BYTES: usize = 16;

type EntropySource = fn(&mut [u8]) -> Result<(), getrandom::Error>;

/// Produces opaque tokens from the operating system CSPRNG.
///
/// There is no fallback source: if the OS cannot supply entropy the
/// calling operation fails with `TokenGenerationFailure`.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    fill: EntropySource,
}

impl TokenGenerator {
    /// Generator reading from the OS random source.
    pub fn new() -> Self {
        Self {
            fill: getrandom::getrandom,
        }
    }

    /// Generator reading from a caller-supplied source.
    pub fn with_source(fill: EntropySource) -> Self {
        Self { fill }
    }

    /// Produce a 32-character lowercase hex token.
    pub fn generate(&self) -> AppResult<String> {
        let mut buf = [0u8; TOKEN_BYTES];
        (self.fill)(&mut buf).map_err(|e| {
            AppError::with_source(
                ErrorKind::TokenGenerationFailure,
                format!("Failed to read entropy: {e}"),
                e,
            )
        })?;
        Ok(hex::encode(buf))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
