//! Object store selection from configuration.

use std::sync::Arc;

use tracing::info;

use secureshare_core::config::StorageConfig;
use secureshare_core::error::AppError;
use secureshare_core::result::AppResult;
use secureshare_core::traits::object_store::ObjectStore;

use crate::providers::MemoryObjectStore;

/// Build the object store named by `storage.provider`.
///
/// `memory` is always available. `s3` requires the `s3` feature.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider.as_str() {
        "memory" => Arc::new(MemoryObjectStore::new(config.bucket.clone())),
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3ObjectStore::connect(config).await?),
        other => {
            return Err(AppError::configuration(format!(
                "Unsupported storage provider '{other}'"
            )));
        }
    };

    info!(
        provider = store.provider_type(),
        bucket = store.bucket(),
        "Object store ready"
    );
    Ok(store)
}
