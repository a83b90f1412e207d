//! In-memory object store provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::{ObjectStore, PresignParams};

use super::encode_query_component;

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw content.
    pub data: Bytes,
    /// MIME type given at upload.
    pub content_type: String,
}

/// Process-local object store.
///
/// Presigned URLs use the `memory://` scheme and carry the lifetime as
/// `X-Expires` so callers can assert on it.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: Arc<DashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Create an empty store for the given bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(DashMap::new()),
        }
    }

    /// Fetch a stored object.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|o| o.value().clone())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        // Removing an absent key succeeds, matching S3 semantics.
        self.objects.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(key))
    }

    async fn presigned_get(
        &self,
        key: &str,
        ttl: Duration,
        extra_params: &PresignParams,
    ) -> AppResult<String> {
        let mut url = format!(
            "memory://{}/{}?X-Expires={}",
            self.bucket,
            encode_query_component(key),
            ttl.as_secs()
        );
        for (k, v) in extra_params {
            url.push('&');
            url.push_str(&encode_query_component(k));
            url.push('=');
            url.push_str(&encode_query_component(v));
        }
        Ok(url)
    }
}
