//! Failure-injecting store wrappers for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Notify;

use secureshare_core::error::AppError;
use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::{ObjectStore, PresignParams};
use secureshare_core::config::TransferConfig;
use secureshare_database::{MemoryFileRecordStore, MetadataStore};
use secureshare_entity::{FileRecord, RecordFilter, RecordPatch};
use secureshare_storage::MemoryObjectStore;

/// Transfer settings with fast compensation for tests.
pub fn transfer_config() -> TransferConfig {
    TransferConfig {
        compensation_backoff_ms: 1,
        ..TransferConfig::default()
    }
}

/// Object store that fails on demand and counts removals.
#[derive(Debug)]
pub struct FlakyObjectStore {
    pub inner: MemoryObjectStore,
    pub fail_put: AtomicBool,
    /// Number of upcoming `remove` calls that fail.
    pub failing_removes: AtomicU32,
    pub fail_exists_for: Mutex<Option<String>>,
    pub put_delay: Mutex<Option<Duration>>,
    pub remove_attempts: AtomicUsize,
    pub removed: Notify,
}

impl FlakyObjectStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryObjectStore::new("test-bucket"),
            fail_put: AtomicBool::new(false),
            failing_removes: AtomicU32::new(0),
            fail_exists_for: Mutex::new(None),
            put_delay: Mutex::new(None),
            remove_attempts: AtomicUsize::new(0),
            removed: Notify::new(),
        }
    }

    pub fn fail_puts(self) -> Self {
        self.fail_put.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_removes(self, n: u32) -> Self {
        self.failing_removes.store(n, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl ObjectStore for FlakyObjectStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let delay = *self.put_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::storage("injected put failure"));
        }
        self.inner.put(key, data, content_type).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.remove_attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_removes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let result = if failing {
            Err(AppError::storage("injected remove failure"))
        } else {
            self.inner.remove(key).await
        };
        self.removed.notify_one();
        result
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        if self.fail_exists_for.lock().unwrap().as_deref() == Some(key) {
            return Err(AppError::storage("injected stat failure"));
        }
        self.inner.exists(key).await
    }

    async fn presigned_get(
        &self,
        key: &str,
        ttl: Duration,
        extra_params: &PresignParams,
    ) -> AppResult<String> {
        self.inner.presigned_get(key, ttl, extra_params).await
    }
}

/// Metadata store that fails on demand and can serve a stale snapshot.
#[derive(Debug, Default)]
pub struct FlakyRecordStore {
    pub inner: MemoryFileRecordStore,
    pub fail_insert: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_find: AtomicBool,
    /// Returned by `find_one` instead of the live record when set.
    pub stale: Mutex<Option<FileRecord>>,
    /// Delay applied to the next `update_one` only.
    pub update_delay: Mutex<Option<Duration>>,
}

impl FlakyRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for FlakyRecordStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert_one(&self, record: &FileRecord) -> AppResult<()> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::database("injected insert failure"));
        }
        self.inner.insert_one(record).await
    }

    async fn find_one(&self, filter: &RecordFilter) -> AppResult<Option<FileRecord>> {
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(AppError::database("injected find failure"));
        }
        if let Some(stale) = self.stale.lock().unwrap().clone() {
            return Ok(Some(stale));
        }
        self.inner.find_one(filter).await
    }

    async fn find(&self, filter: &RecordFilter) -> AppResult<Vec<FileRecord>> {
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(AppError::database("injected find failure"));
        }
        self.inner.find(filter).await
    }

    async fn update_one(&self, filter: &RecordFilter, patch: &RecordPatch) -> AppResult<u64> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AppError::database("injected update failure"));
        }
        let delay = self.update_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.update_one(filter, patch).await
    }

    async fn delete_one(&self, filter: &RecordFilter) -> AppResult<u64> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::database("injected delete failure"));
        }
        self.inner.delete_one(filter).await
    }
}
