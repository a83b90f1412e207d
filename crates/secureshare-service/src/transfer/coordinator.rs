//! Upload and delete across the object store and the metadata store.
//!
//! Both stores are written concurrently and fail independently. The
//! outcome of each dual operation is classified from the joint result:
//!
//! | blob  | metadata | upload                          | delete                    |
//! |-------|----------|---------------------------------|---------------------------|
//! | ok    | ok       | record returned                 | ok                        |
//! | fail  | ok       | row removed, `StorageWriteFailure` | `StorageDeletionFailure` |
//! | ok    | fail     | blob compensated, `MetadataWriteFailure` | `MetadataDeletionFailure` |
//! | fail  | fail     | `StorageWriteFailure`           | `FullDeletionFailure`     |

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use secureshare_core::config::TransferConfig;
use secureshare_core::error::{AppError, ErrorKind};
use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::ObjectStore;
use secureshare_core::types::FileId;
use secureshare_database::MetadataStore;
use secureshare_entity::{FileRecord, RecordFilter};

use super::compensation::Compensator;
use crate::fanout::{bounded, distinct, join_keyed, join_pair};
use crate::token::TokenGenerator;

/// Keeps blobs and metadata records link-consistent.
#[derive(Debug, Clone)]
pub struct TransferCoordinator {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn MetadataStore>,
    tokens: TokenGenerator,
    compensator: Compensator,
    config: TransferConfig,
    max_upload_bytes: u64,
}

impl TransferCoordinator {
    /// Creates a coordinator over the two stores.
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        records: Arc<dyn MetadataStore>,
        tokens: TokenGenerator,
        config: TransferConfig,
        max_upload_bytes: u64,
    ) -> Self {
        let compensator = Compensator::new(objects.clone(), config.clone());
        Self {
            objects,
            records,
            tokens,
            compensator,
            config,
            max_upload_bytes,
        }
    }

    /// Store `data` as a new file owned by `owner`.
    ///
    /// The blob write and the metadata insert run concurrently. The returned
    /// record carries a time-limited token that expires with the retention
    /// window.
    pub async fn upload(
        &self,
        owner: &str,
        data: Bytes,
        filename: &str,
        content_type: Option<String>,
    ) -> AppResult<FileRecord> {
        validate_upload(owner, filename, data.len(), self.max_upload_bytes)?;

        let token = self.tokens.generate()?;
        let record = FileRecord::for_upload(
            owner,
            filename,
            content_type,
            data.len(),
            token,
            self.config.retention(),
            Utc::now(),
        );
        let key = record.object_key();
        let limit = self.config.operation_timeout();

        let (blob, meta) = join_pair(
            bounded(limit, "object put", self.objects.put(&key, data, &record.content_type)),
            bounded(limit, "metadata insert", self.records.insert_one(&record)),
        )
        .await;

        match (blob, meta) {
            (Ok(()), Ok(())) => {
                info!(
                    file_id = %record.id,
                    owner = %record.owner,
                    key = %key,
                    size = record.size_bytes,
                    "Upload completed"
                );
                Ok(record)
            }
            (Err(blob_err), meta) => {
                if meta.is_ok() {
                    self.remove_dangling_record(record.id).await;
                }
                Err(AppError::wrap(
                    ErrorKind::StorageWriteFailure,
                    format!("upload {key}"),
                    blob_err,
                ))
            }
            (Ok(()), Err(meta_err)) => {
                warn!(
                    file_id = %record.id,
                    key = %key,
                    error = %meta_err,
                    "Metadata insert failed after blob write, compensating"
                );
                self.compensator.schedule(key.clone());
                Err(AppError::wrap(
                    ErrorKind::MetadataWriteFailure,
                    format!("upload {}", record.id),
                    meta_err,
                ))
            }
        }
    }

    /// Delete one file owned by `owner` from both stores.
    pub async fn delete(&self, file_id: FileId, owner: &str) -> AppResult<()> {
        let filter = RecordFilter::by_id(file_id).owned_by(owner);
        let limit = self.config.operation_timeout();

        let record = bounded(limit, "metadata lookup", self.records.find_one(&filter))
            .await
            .map_err(|e| AppError::wrap(e.kind, format!("delete {file_id}"), e))?
            .ok_or_else(|| {
                AppError::not_found_or_forbidden(format!("File {file_id} not found"))
            })?;
        let key = record.object_key();

        let (blob, meta) = join_pair(
            bounded(limit, "object remove", self.objects.remove(&key)),
            bounded(limit, "metadata delete", self.records.delete_one(&filter)),
        )
        .await;

        match (blob, meta) {
            (Ok(()), Ok(_)) => {
                info!(file_id = %file_id, owner, key = %key, "File deleted");
                Ok(())
            }
            (Err(blob_err), Err(meta_err)) => Err(AppError::new(
                ErrorKind::FullDeletionFailure,
                format!(
                    "delete {file_id}: blob {key}: {}; record: {}",
                    blob_err.message, meta_err.message
                ),
            )),
            (Err(blob_err), Ok(_)) => Err(AppError::wrap(
                ErrorKind::StorageDeletionFailure,
                format!("delete {file_id}: blob {key}"),
                blob_err,
            )),
            (Ok(()), Err(meta_err)) => Err(AppError::wrap(
                ErrorKind::MetadataDeletionFailure,
                format!("delete {file_id}: record"),
                meta_err,
            )),
        }
    }

    /// Delete many files independently. Every requested identifier gets
    /// its own slot; malformed identifiers yield `InvalidInput` there.
    /// A repeated identifier is deleted once and reported once.
    pub async fn delete_batch(
        &self,
        raw_ids: Vec<String>,
        owner: &str,
    ) -> BTreeMap<String, AppResult<()>> {
        join_keyed(distinct(raw_ids), |raw| async move {
            let file_id = FileId::parse(&raw)?;
            self.delete(file_id, owner).await
        })
        .await
        .into_iter()
        .collect()
    }

    /// Fetch the metadata of a file owned by `owner`.
    pub async fn get_file(&self, file_id: FileId, owner: &str) -> AppResult<FileRecord> {
        bounded(
            self.config.operation_timeout(),
            "metadata lookup",
            self.records
                .find_one(&RecordFilter::by_id(file_id).owned_by(owner)),
        )
        .await
        .map_err(|e| AppError::wrap(e.kind, format!("get {file_id}"), e))?
        .ok_or_else(|| AppError::not_found_or_forbidden(format!("File {file_id} not found")))
    }

    /// Drop a record whose blob could not be written.
    async fn remove_dangling_record(&self, file_id: FileId) {
        let result = bounded(
            self.config.operation_timeout(),
            "metadata delete",
            self.records.delete_one(&RecordFilter::by_id(file_id)),
        )
        .await;
        match result {
            Ok(_) => info!(file_id = %file_id, "Removed record of failed upload"),
            Err(e) => warn!(
                file_id = %file_id,
                error = %e,
                "Could not remove record of failed upload"
            ),
        }
    }
}

fn validate_upload(owner: &str, filename: &str, size: usize, max: u64) -> AppResult<()> {
    if owner.trim().is_empty() {
        return Err(AppError::invalid_input("Owner is required"));
    }
    if filename.trim().is_empty() {
        return Err(AppError::invalid_input("Filename is required"));
    }
    if filename.contains(['/', '\\']) {
        return Err(AppError::invalid_input(format!(
            "Filename '{filename}' must not contain path separators"
        )));
    }
    if size as u64 > max {
        return Err(AppError::invalid_input(format!(
            "File exceeds maximum upload size of {max} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use crate::testing::{FlakyObjectStore, FlakyRecordStore, transfer_config};
    use secureshare_entity::TokenType;

    const MAX: u64 = 1024;

    fn coordinator(
        objects: &Arc<FlakyObjectStore>,
        records: &Arc<FlakyRecordStore>,
    ) -> TransferCoordinator {
        TransferCoordinator::new(
            objects.clone(),
            records.clone(),
            TokenGenerator::new(),
            transfer_config(),
            MAX,
        )
    }

    fn stores() -> (Arc<FlakyObjectStore>, Arc<FlakyRecordStore>) {
        (
            Arc::new(FlakyObjectStore::new()),
            Arc::new(FlakyRecordStore::new()),
        )
    }

    #[tokio::test]
    async fn test_upload_links_blob_and_record() {
        let (objects, records) = stores();
        let record = coordinator(&objects, &records)
            .upload("u1", Bytes::from_static(b"hello"), "a.txt", None)
            .await
            .unwrap();

        assert_eq!(record.token_type, TokenType::TimeLimited);
        assert_eq!(record.token_expires, record.created_at + chrono::Duration::hours(24));
        assert_eq!(record.download_token.as_ref().map(String::len), Some(32));

        let stored = records.inner.get(record.id).unwrap();
        assert_eq!(stored, record);
        let blob = objects.inner.get(&record.object_key()).unwrap();
        assert_eq!(blob.data, Bytes::from_static(b"hello"));
        assert_eq!(record.object_key(), format!("{}_a.txt", record.id));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_input() {
        let (objects, records) = stores();
        let coordinator = coordinator(&objects, &records);
        for (owner, name, size) in [("u1", "", 1), ("", "a.txt", 1), ("u1", "../a", 1), ("u1", "a\\b", 1)] {
            let err = coordinator
                .upload(owner, Bytes::from(vec![0u8; size]), name, None)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "{owner:?} {name:?}");
        }
        let err = coordinator
            .upload("u1", Bytes::from(vec![0u8; MAX as usize + 1]), "big.bin", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(records.inner.is_empty());
        assert!(objects.inner.is_empty());
    }

    #[tokio::test]
    async fn test_blob_failure_leaves_no_record() {
        let objects = Arc::new(FlakyObjectStore::new().fail_puts());
        let records = Arc::new(FlakyRecordStore::new());

        let err = coordinator(&objects, &records)
            .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::StorageWriteFailure);
        assert!(records.inner.is_empty());
    }

    #[tokio::test]
    async fn test_metadata_failure_compensates_blob() {
        let (objects, records) = stores();
        records.fail_insert.store(true, Ordering::SeqCst);

        let err = coordinator(&objects, &records)
            .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MetadataWriteFailure);

        tokio::time::timeout(Duration::from_secs(5), objects.removed.notified())
            .await
            .expect("compensating remove was not issued");
        assert_eq!(objects.remove_attempts.load(Ordering::SeqCst), 1);
        assert!(objects.inner.is_empty());
    }

    #[tokio::test]
    async fn test_double_upload_failure_reports_storage() {
        let objects = Arc::new(FlakyObjectStore::new().fail_puts());
        let records = Arc::new(FlakyRecordStore::new());
        records.fail_insert.store(true, Ordering::SeqCst);

        let err = coordinator(&objects, &records)
            .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageWriteFailure);
        assert_eq!(objects.remove_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_blob_write_times_out() {
        let (objects, records) = stores();
        *objects.put_delay.lock().unwrap() = Some(Duration::from_secs(60));

        let err = coordinator(&objects, &records)
            .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageWriteFailure);
        assert!(err.message.contains("did not complete"));
        assert!(records.inner.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_both_sides() {
        let (objects, records) = stores();
        let coordinator = coordinator(&objects, &records);
        let record = coordinator
            .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
            .await
            .unwrap();

        coordinator.delete(record.id, "u1").await.unwrap();
        assert!(records.inner.is_empty());
        assert!(objects.inner.is_empty());
    }

    #[tokio::test]
    async fn test_delete_absent_or_foreign_is_not_found() {
        let (objects, records) = stores();
        let coordinator = coordinator(&objects, &records);
        let record = coordinator
            .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
            .await
            .unwrap();

        let err = coordinator.delete(record.id, "u2").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFoundOrForbidden);
        let err = coordinator.delete(FileId::new(), "u1").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFoundOrForbidden);
        assert_eq!(objects.remove_attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_classifies_partial_failures() {
        let cases = [
            (true, false, ErrorKind::StorageDeletionFailure),
            (false, true, ErrorKind::MetadataDeletionFailure),
            (true, true, ErrorKind::FullDeletionFailure),
        ];
        for (blob_fails, meta_fails, expected) in cases {
            let (objects, records) = stores();
            let coordinator = coordinator(&objects, &records);
            let record = coordinator
                .upload("u1", Bytes::from_static(b"x"), "a.txt", None)
                .await
                .unwrap();
            if blob_fails {
                objects.failing_removes.store(1, Ordering::SeqCst);
            }
            records.fail_delete.store(meta_fails, Ordering::SeqCst);

            let err = coordinator.delete(record.id, "u1").await.unwrap_err();
            assert_eq!(err.kind, expected);
            assert_eq!(objects.inner.get(&record.object_key()).is_some(), blob_fails);
            assert_eq!(records.inner.get(record.id).is_some(), meta_fails);
        }
    }

    #[tokio::test]
    async fn test_delete_batch_isolates_failures() {
        let (objects, records) = stores();
        let coordinator = coordinator(&objects, &records);
        let mine_a = coordinator
            .upload("u1", Bytes::from_static(b"a"), "a.txt", None)
            .await
            .unwrap();
        let mine_b = coordinator
            .upload("u1", Bytes::from_static(b"b"), "b.txt", None)
            .await
            .unwrap();
        let theirs = coordinator
            .upload("u2", Bytes::from_static(b"c"), "c.txt", None)
            .await
            .unwrap();

        let ids = vec![
            mine_a.id.to_string(),
            theirs.id.to_string(),
            "not-a-uuid".to_string(),
            mine_b.id.to_string(),
        ];
        let results = coordinator.delete_batch(ids, "u1").await;

        assert_eq!(results.len(), 4);
        assert!(results[&mine_a.id.to_string()].is_ok());
        assert!(results[&mine_b.id.to_string()].is_ok());
        assert_eq!(
            results[&theirs.id.to_string()].as_ref().unwrap_err().kind,
            ErrorKind::NotFoundOrForbidden
        );
        assert_eq!(
            results["not-a-uuid"].as_ref().unwrap_err().kind,
            ErrorKind::InvalidInput
        );
        assert!(records.inner.get(theirs.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_batch_repeated_id_reports_success() {
        let (objects, records) = stores();
        let coordinator = coordinator(&objects, &records);
        let record = coordinator
            .upload("u1", Bytes::from_static(b"a"), "a.txt", None)
            .await
            .unwrap();

        let id = record.id.to_string();
        let results = coordinator
            .delete_batch(vec![id.clone(), id.clone()], "u1")
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[&id].is_ok());
        assert!(records.inner.get(record.id).is_none());
        assert!(objects.inner.get(&record.object_key()).is_none());
        assert_eq!(objects.remove_attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_file_is_owner_scoped() {
        let (objects, records) = stores();
        let coordinator = coordinator(&objects, &records);
        let record = coordinator
            .upload("u1", Bytes::from_static(b"x"), "a.txt", Some("text/plain".into()))
            .await
            .unwrap();

        let found = coordinator.get_file(record.id, "u1").await.unwrap();
        assert_eq!(found.content_type, "text/plain");
        let err = coordinator.get_file(record.id, "u2").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFoundOrForbidden);
    }
}
