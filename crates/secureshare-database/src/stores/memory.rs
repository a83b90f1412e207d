//! In-memory metadata store backed by a concurrent hash map.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use secureshare_core::error::AppError;
use secureshare_core::result::AppResult;
use secureshare_core::types::FileId;
use secureshare_entity::{FileRecord, RecordFilter, RecordPatch};

use super::MetadataStore;

/// Process-local metadata store.
///
/// Filter evaluation and mutation run under the shard lock of the keyed
/// entry, so conditional updates are atomic like their SQL counterparts.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileRecordStore {
    records: Arc<DashMap<FileId, FileRecord>>,
}

impl MemoryFileRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot a record by identifier.
    pub fn get(&self, id: FileId) -> Option<FileRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }
}

#[async_trait]
impl MetadataStore for MemoryFileRecordStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert_one(&self, record: &FileRecord) -> AppResult<()> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(AppError::database(format!(
                "Duplicate file record {}",
                record.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find_one(&self, filter: &RecordFilter) -> AppResult<Option<FileRecord>> {
        if let Some(id) = filter.id {
            return Ok(self
                .records
                .get(&id)
                .filter(|r| filter.matches(r))
                .map(|r| r.value().clone()));
        }
        Ok(self
            .records
            .iter()
            .find(|r| filter.matches(r.value()))
            .map(|r| r.value().clone()))
    }

    async fn find(&self, filter: &RecordFilter) -> AppResult<Vec<FileRecord>> {
        let mut records: Vec<FileRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn update_one(&self, filter: &RecordFilter, patch: &RecordPatch) -> AppResult<u64> {
        let id = filter
            .id
            .ok_or_else(|| AppError::database("update_one requires an identifier in the filter"))?;
        match self.records.get_mut(&id) {
            Some(mut record) if filter.matches(&record) => {
                patch.apply(&mut record);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_one(&self, filter: &RecordFilter) -> AppResult<u64> {
        let id = filter
            .id
            .ok_or_else(|| AppError::database("delete_one requires an identifier in the filter"))?;
        Ok(self
            .records
            .remove_if(&id, |_, record| filter.matches(record))
            .map_or(0, |_| 1))
    }
}
