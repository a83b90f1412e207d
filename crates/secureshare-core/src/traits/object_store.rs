//! Object store trait for pluggable blob backends.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Extra query parameters signed into a presigned URL.
pub type PresignParams = BTreeMap<String, String>;

/// Blob storage bound to a single bucket.
///
/// Implementations exist for S3-compatible services and for an in-memory
/// map. The trait is defined here in `secureshare-core` and implemented in
/// `secureshare-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// The bucket all keys are resolved against.
    fn bucket(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store `data` under `key`, replacing any previous object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Remove the object at `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Build a time-boxed GET URL for `key`.
    ///
    /// `extra_params` are added to the query string before signing, so the
    /// URL is only valid with exactly those values.
    async fn presigned_get(
        &self,
        key: &str,
        ttl: Duration,
        extra_params: &PresignParams,
    ) -> AppResult<String>;
}
