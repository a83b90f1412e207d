//! File record entity model.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use secureshare_core::types::FileId;

use super::token::TokenType;

/// Fallback MIME type when the client supplies none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Metadata of one stored object.
///
/// The blob lives in the object store under [`FileRecord::object_key`];
/// everything else, including the current download token, lives in the
/// metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique record identifier, generated at upload.
    pub id: FileId,
    /// Original client-supplied file name.
    pub filename: String,
    /// Identity of the uploading user.
    pub owner: String,
    /// MIME type recorded at upload.
    pub content_type: String,
    /// Content length in bytes.
    pub size_bytes: i64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// End of the default retention window.
    pub expires_at: DateTime<Utc>,
    /// Current download token. Never exposed in API responses.
    #[serde(skip_serializing, default)]
    pub download_token: Option<String>,
    /// How the current token may be used.
    pub token_type: TokenType,
    /// Expiry instant of the current token.
    pub token_expires: DateTime<Utc>,
}

impl FileRecord {
    /// Build the record for a fresh upload.
    ///
    /// The initial token is time-limited and expires together with the
    /// retention window.
    pub fn for_upload(
        owner: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<String>,
        size_bytes: usize,
        token: String,
        retention: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = expiry_after(now, retention);
        Self {
            id: FileId::new(),
            filename: filename.into(),
            owner: owner.into(),
            content_type: content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            size_bytes: size_bytes as i64,
            created_at: now,
            expires_at,
            download_token: Some(token),
            token_type: TokenType::TimeLimited,
            token_expires: expires_at,
        }
    }

    /// Object key of the blob: `{id}_{filename}`.
    pub fn object_key(&self) -> String {
        object_key(self.id, &self.filename)
    }

    /// Whether the token has passed its expiry instant at `now`.
    pub fn token_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.token_expires
    }
}

/// The instant `lifetime` after `now`, saturating at the latest
/// representable time.
pub fn expiry_after(now: DateTime<Utc>, lifetime: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(lifetime)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Derive the object key for a record identifier and file name.
pub fn object_key(id: FileId, filename: &str) -> String {
    format!("{id}_{filename}")
}
