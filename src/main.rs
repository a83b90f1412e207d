//! SecureShare Server: owner-scoped file storage with tokenized downloads.
//!
//! Main entry point that wires the stores and services together and starts
//! the HTTP server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use secureshare_api::AppState;
use secureshare_core::config::AppConfig;
use secureshare_core::error::AppError;
use secureshare_database::{DatabasePool, MemoryFileRecordStore, MetadataStore, PgFileRecordStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("SECURESHARE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SecureShare v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(provider = %config.storage.provider, bucket = %config.storage.bucket, "Initializing object store");
    let objects = secureshare_storage::build_object_store(&config.storage).await?;

    let (records, pool): (Arc<dyn MetadataStore>, Option<DatabasePool>) =
        match config.database.provider.as_str() {
            "postgres" => {
                tracing::info!("Connecting to database...");
                let pool = DatabasePool::connect(&config.database).await?;
                let store = PgFileRecordStore::new(pool.pool().clone());
                (Arc::new(store), Some(pool))
            }
            "memory" => {
                tracing::warn!("Using in-memory metadata store, records are lost on restart");
                (Arc::new(MemoryFileRecordStore::new()), None)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider '{other}'"
                )));
            }
        };

    let state = AppState::new(config, objects, records);
    let result = secureshare_api::serve(state).await;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }
    result
}
