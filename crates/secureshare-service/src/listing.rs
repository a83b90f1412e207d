//! Owner file listing with best-effort blob presence annotation.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use secureshare_core::config::TransferConfig;
use secureshare_core::error::AppError;
use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::ObjectStore;
use secureshare_database::MetadataStore;
use secureshare_entity::{FileRecord, RecordFilter};

use crate::fanout::{bounded, join_keyed};

/// A listed record plus whether its blob was found.
#[derive(Debug, Clone, Serialize)]
pub struct ListedFile {
    /// The stored record.
    #[serde(flatten)]
    pub record: FileRecord,
    /// `None` when the presence check itself failed.
    pub blob_present: Option<bool>,
}

/// Lists an owner's files.
#[derive(Debug, Clone)]
pub struct ListingAggregator {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn MetadataStore>,
    config: TransferConfig,
}

impl ListingAggregator {
    /// Creates an aggregator over the two stores.
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        records: Arc<dyn MetadataStore>,
        config: TransferConfig,
    ) -> Self {
        Self {
            objects,
            records,
            config,
        }
    }

    /// All records owned by `owner`, newest first.
    ///
    /// Blob presence is checked concurrently for every record. A failed
    /// check only blanks that record's annotation.
    pub async fn list_files(&self, owner: &str) -> AppResult<Vec<ListedFile>> {
        let limit = self.config.operation_timeout();
        let records = bounded(
            limit,
            "metadata find",
            self.records.find(&RecordFilter::by_owner(owner)),
        )
        .await
        .map_err(|e| AppError::wrap(e.kind, format!("list files of {owner}"), e))?;

        let annotated = join_keyed(records, |record| async move {
            let key = record.object_key();
            match bounded(limit, "object stat", self.objects.exists(&key)).await {
                Ok(present) => Some(present),
                Err(e) => {
                    warn!(file_id = %record.id, key = %key, error = %e, "Blob presence check failed");
                    None
                }
            }
        })
        .await;

        Ok(annotated
            .into_iter()
            .map(|(record, blob_present)| ListedFile {
                record,
                blob_present,
            })
            .collect())
    }
}
