//! Schema migration runner.

use sqlx::PgPool;
use tracing::info;

use secureshare_core::error::{AppError, ErrorKind};

/// Apply the `file_records` schema if it is not already present.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed");
    Ok(())
}
