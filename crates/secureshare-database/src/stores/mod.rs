//! Metadata store abstraction and its implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryFileRecordStore;
pub use postgres::PgFileRecordStore;

use async_trait::async_trait;

use secureshare_core::result::AppResult;
use secureshare_entity::{FileRecord, RecordFilter, RecordPatch};

/// Durable storage for [`FileRecord`]s.
///
/// `update_one` and `delete_one` evaluate the filter and the mutation as a
/// single atomic step and report how many records matched. Callers use a
/// zero count to detect that a conditional update lost a race.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short name of the backing engine.
    fn provider_type(&self) -> &str;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Insert a new record.
    async fn insert_one(&self, record: &FileRecord) -> AppResult<()>;

    /// Fetch the first record matching `filter`.
    async fn find_one(&self, filter: &RecordFilter) -> AppResult<Option<FileRecord>>;

    /// Fetch every matching record, newest first.
    async fn find(&self, filter: &RecordFilter) -> AppResult<Vec<FileRecord>>;

    /// Apply `patch` to the record matching `filter`. Returns the match count.
    async fn update_one(&self, filter: &RecordFilter, patch: &RecordPatch) -> AppResult<u64>;

    /// Remove the record matching `filter`. Returns the removal count.
    async fn delete_one(&self, filter: &RecordFilter) -> AppResult<u64>;
}
