//! PostgreSQL-backed metadata store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use secureshare_core::error::{AppError, ErrorKind};
use secureshare_core::result::AppResult;
use secureshare_entity::{FileRecord, RecordFilter, RecordPatch};

use super::MetadataStore;

const SELECT_RECORDS: &str = "SELECT id, filename, owner, content_type, size_bytes, created_at, \
     expires_at, download_token, token_type, token_expires FROM file_records";

/// Metadata store over the `file_records` table.
#[derive(Debug, Clone)]
pub struct PgFileRecordStore {
    pool: PgPool,
}

impl PgFileRecordStore {
    /// Create a store using an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append `WHERE` conditions for every set filter field.
fn push_conditions<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a RecordFilter) {
    qb.push(" WHERE TRUE");
    if let Some(id) = filter.id {
        qb.push(" AND id = ").push_bind(id);
    }
    if let Some(owner) = filter.owner.as_deref() {
        qb.push(" AND owner = ").push_bind(owner);
    }
    if let Some(token) = filter.download_token.as_deref() {
        qb.push(" AND download_token = ").push_bind(token);
    }
}

/// Single-record mutations must be keyed by identifier.
fn require_id(filter: &RecordFilter, op: &str) -> AppResult<()> {
    if filter.id.is_none() {
        return Err(AppError::database(format!(
            "{op} requires an identifier in the filter"
        )));
    }
    Ok(())
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, format!("{context}: {e}"), e)
}

#[async_trait]
impl MetadataStore for PgFileRecordStore {
    fn provider_type(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_err("Health check failed"))
    }

    async fn insert_one(&self, record: &FileRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO file_records (id, filename, owner, content_type, size_bytes, created_at, \
             expires_at, download_token, token_type, token_expires) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(record.id)
        .bind(&record.filename)
        .bind(&record.owner)
        .bind(&record.content_type)
        .bind(record.size_bytes)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(&record.download_token)
        .bind(record.token_type)
        .bind(record.token_expires)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to insert file record"))?;
        Ok(())
    }

    async fn find_one(&self, filter: &RecordFilter) -> AppResult<Option<FileRecord>> {
        let mut qb = QueryBuilder::new(SELECT_RECORDS);
        push_conditions(&mut qb, filter);
        qb.push(" LIMIT 1");
        qb.build_query_as::<FileRecord>()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find file record"))
    }

    async fn find(&self, filter: &RecordFilter) -> AppResult<Vec<FileRecord>> {
        let mut qb = QueryBuilder::new(SELECT_RECORDS);
        push_conditions(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC");
        qb.build_query_as::<FileRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list file records"))
    }

    async fn update_one(&self, filter: &RecordFilter, patch: &RecordPatch) -> AppResult<u64> {
        require_id(filter, "update_one")?;

        let mut qb = QueryBuilder::new("UPDATE file_records SET ");
        match patch {
            RecordPatch::SetToken {
                token,
                token_type,
                expires,
            } => {
                qb.push("download_token = ")
                    .push_bind(token.as_str())
                    .push(", token_type = ")
                    .push_bind(*token_type)
                    .push(", token_expires = ")
                    .push_bind(*expires);
            }
            RecordPatch::ClearToken => {
                qb.push("download_token = NULL");
            }
        }
        push_conditions(&mut qb, filter);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to update file record"))?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, filter: &RecordFilter) -> AppResult<u64> {
        require_id(filter, "delete_one")?;

        let mut qb = QueryBuilder::new("DELETE FROM file_records");
        push_conditions(&mut qb, filter);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete file record"))?;
        Ok(result.rows_affected())
    }
}
