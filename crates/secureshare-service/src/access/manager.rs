//! The download token state machine.
//!
//! A record holds at most one live token. Issuing overwrites it; a
//! one-time token is cleared by its first successful validation; any token
//! lapses once `token_expires` has passed. Nothing ever reactivates a
//! consumed or expired token.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use secureshare_core::config::TransferConfig;
use secureshare_core::error::{AppError, ErrorKind};
use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::{ObjectStore, PresignParams};
use secureshare_core::types::FileId;
use secureshare_database::MetadataStore;
use secureshare_entity::file::model::expiry_after;
use secureshare_entity::{FileRecord, RecordFilter, RecordPatch, TokenType};

use crate::fanout::{bounded, distinct, join_keyed};
use crate::token::TokenGenerator;

/// Longest lifetime a presigned URL may be requested for (7 days).
pub const MAX_PRESIGN_DURATION: Duration = Duration::from_secs(7 * 24 * 3600);

/// Query parameter carrying the download token in issued URLs.
const TOKEN_PARAM: &str = "token";

/// Outcome of a batch issuance: one slot per requested identifier.
#[derive(Debug, Default)]
pub struct BatchIssue {
    /// Presigned URLs by file identifier.
    pub urls: BTreeMap<String, String>,
    /// Failures by file identifier, in request order.
    pub errors: Vec<(String, AppError)>,
}

/// Issues and validates download tokens.
#[derive(Debug, Clone)]
pub struct AccessTokenManager {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn MetadataStore>,
    tokens: TokenGenerator,
    config: TransferConfig,
}

impl AccessTokenManager {
    /// Creates a token manager over the two stores.
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        records: Arc<dyn MetadataStore>,
        tokens: TokenGenerator,
        config: TransferConfig,
    ) -> Self {
        Self {
            objects,
            records,
            tokens,
            config,
        }
    }

    /// Mint a new token for a file and return a presigned URL carrying it.
    ///
    /// A zero `duration` selects the configured default. One-time tokens
    /// always expire after the fixed one-time lifetime.
    pub async fn issue_token(
        &self,
        file_id: FileId,
        owner: &str,
        token_type: TokenType,
        duration: Duration,
    ) -> AppResult<String> {
        if duration > MAX_PRESIGN_DURATION {
            return Err(AppError::invalid_input(format!(
                "Duration exceeds the maximum of {} seconds",
                MAX_PRESIGN_DURATION.as_secs()
            )));
        }

        let record = self.find(file_id, "issue").await?;
        if record.owner != owner {
            return Err(AppError::unauthorized(format!(
                "Not the owner of file {file_id}"
            )));
        }

        let token = self.tokens.generate()?;
        let (lifetime, url_ttl) = self.lifetimes(token_type, duration);
        let expires = expiry_after(Utc::now(), lifetime);

        let patch = RecordPatch::SetToken {
            token: token.clone(),
            token_type,
            expires,
        };
        let matched = bounded(
            self.config.operation_timeout(),
            "metadata update",
            self.records
                .update_one(&RecordFilter::by_id(file_id).owned_by(owner), &patch),
        )
        .await
        .map_err(|e| AppError::wrap(ErrorKind::MetadataWriteFailure, format!("issue {file_id}"), e))?;
        if matched == 0 {
            return Err(AppError::not_found_or_forbidden(format!(
                "File {file_id} not found"
            )));
        }

        let mut params = PresignParams::new();
        params.insert(TOKEN_PARAM.to_string(), token);
        let url = self.presign(&record, url_ttl, &params).await?;

        info!(
            file_id = %file_id,
            owner,
            token_type = %token_type,
            expires = %expires,
            "Download token issued"
        );
        Ok(url)
    }

    /// Issue tokens for many files concurrently. Malformed identifiers and
    /// per-file failures land in `errors` without affecting the others.
    /// A repeated identifier is issued once.
    pub async fn issue_tokens(
        &self,
        raw_ids: Vec<String>,
        owner: &str,
        token_type: TokenType,
        duration: Duration,
    ) -> BatchIssue {
        let results = join_keyed(distinct(raw_ids), |raw| async move {
            let file_id = FileId::parse(&raw)?;
            self.issue_token(file_id, owner, token_type, duration).await
        })
        .await;

        results
            .into_iter()
            .fold(BatchIssue::default(), |mut batch, (raw, result)| {
                match result {
                    Ok(url) => {
                        batch.urls.insert(raw, url);
                    }
                    Err(e) => batch.errors.push((raw, e)),
                }
                batch
            })
    }

    /// Check `provided` against the stored token and return a short-lived
    /// download URL. A one-time token is cleared before the URL is
    /// returned; if clearing fails the call fails.
    pub async fn validate_and_consume(&self, file_id: FileId, provided: &str) -> AppResult<String> {
        let record = self.find(file_id, "validate").await?;

        let stored = record.download_token.as_deref();
        if provided.is_empty() || stored != Some(provided) {
            return Err(AppError::invalid_token(format!(
                "Invalid download token for file {file_id}"
            )));
        }
        if record.token_expired_at(Utc::now()) {
            return Err(AppError::token_expired(format!(
                "Download token for file {file_id} expired at {}",
                record.token_expires
            )));
        }

        if record.token_type.is_single_use() {
            let matched = bounded(
                self.config.operation_timeout(),
                "metadata update",
                self.records.update_one(
                    &RecordFilter::by_id(file_id).with_token(provided),
                    &RecordPatch::ClearToken,
                ),
            )
            .await
            .map_err(|e| {
                AppError::wrap(
                    ErrorKind::MetadataWriteFailure,
                    format!("consume token of {file_id}"),
                    e,
                )
            })?;
            if matched == 0 {
                warn!(file_id = %file_id, "One-time token already consumed");
                return Err(AppError::invalid_token(format!(
                    "Invalid download token for file {file_id}"
                )));
            }
            info!(file_id = %file_id, "One-time token consumed");
        }

        self.presign(&record, self.config.download_url_ttl(), &PresignParams::new())
            .await
    }

    /// Token lifetime and URL lifetime for a request.
    fn lifetimes(&self, token_type: TokenType, requested: Duration) -> (Duration, Duration) {
        match token_type {
            TokenType::OneTime => {
                let ceiling = self.config.one_time_token_ttl();
                let url_ttl = if requested.is_zero() || requested > ceiling {
                    ceiling
                } else {
                    requested
                };
                (ceiling, url_ttl)
            }
            TokenType::TimeLimited => {
                let lifetime = if requested.is_zero() {
                    self.config.default_token_ttl()
                } else {
                    requested
                };
                (lifetime, lifetime)
            }
        }
    }

    async fn find(&self, file_id: FileId, op: &str) -> AppResult<FileRecord> {
        bounded(
            self.config.operation_timeout(),
            "metadata lookup",
            self.records.find_one(&RecordFilter::by_id(file_id)),
        )
        .await
        .map_err(|e| AppError::wrap(e.kind, format!("{op} {file_id}"), e))?
        .ok_or_else(|| AppError::not_found_or_forbidden(format!("File {file_id} not found")))
    }

    async fn presign(
        &self,
        record: &FileRecord,
        ttl: Duration,
        params: &PresignParams,
    ) -> AppResult<String> {
        let key = record.object_key();
        bounded(
            self.config.operation_timeout(),
            "presign",
            self.objects.presigned_get(&key, ttl, params),
        )
        .await
        .map_err(|e| AppError::wrap(e.kind, format!("presign {key}"), e))
    }
}
