//! Query filters and token patches for file records.

use chrono::{DateTime, Utc};

use secureshare_core::types::FileId;

use super::model::FileRecord;
use super::token::TokenType;

/// Conjunction of equality conditions on a [`FileRecord`].
///
/// Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Match on record identifier.
    pub id: Option<FileId>,
    /// Match on owner identity.
    pub owner: Option<String>,
    /// Match on the currently stored download token.
    pub download_token: Option<String>,
}

impl RecordFilter {
    /// Filter selecting a single record by identifier.
    pub fn by_id(id: FileId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Filter selecting every record of one owner.
    pub fn by_owner(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..Self::default()
        }
    }

    /// Additionally require the given owner.
    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Additionally require the given stored token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.download_token = Some(token.into());
        self
    }

    /// Evaluate the filter against a record.
    pub fn matches(&self, record: &FileRecord) -> bool {
        self.id.is_none_or(|id| record.id == id)
            && self
                .owner
                .as_deref()
                .is_none_or(|owner| record.owner == owner)
            && self
                .download_token
                .as_deref()
                .is_none_or(|token| record.download_token.as_deref() == Some(token))
    }
}

/// The only mutations ever applied to a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPatch {
    /// Replace the token fields, invalidating any previous token.
    SetToken {
        /// New opaque token.
        token: String,
        /// Usage mode of the new token.
        token_type: TokenType,
        /// Expiry instant of the new token.
        expires: DateTime<Utc>,
    },
    /// Remove the token so it can no longer be presented.
    ClearToken,
}

impl RecordPatch {
    /// Apply this patch to an in-memory record.
    pub fn apply(&self, record: &mut FileRecord) {
        match self {
            Self::SetToken {
                token,
                token_type,
                expires,
            } => {
                record.download_token = Some(token.clone());
                record.token_type = *token_type;
                record.token_expires = *expires;
            }
            Self::ClearToken => record.download_token = None,
        }
    }
}
