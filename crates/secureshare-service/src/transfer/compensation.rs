//! Compensating blob removal after a partially failed upload.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use secureshare_core::config::TransferConfig;
use secureshare_core::traits::object_store::ObjectStore;

use crate::fanout::bounded;

/// Removes blobs that were written without a matching metadata record.
///
/// Runs detached from the request. After the configured number of failed
/// attempts the key is reported with `dead_letter = true` for out-of-band
/// reconciliation.
#[derive(Debug, Clone)]
pub struct Compensator {
    objects: Arc<dyn ObjectStore>,
    config: TransferConfig,
}

impl Compensator {
    /// Creates a compensator over the given object store.
    pub fn new(objects: Arc<dyn ObjectStore>, config: TransferConfig) -> Self {
        Self { objects, config }
    }

    /// Spawn the removal of `key`. The handle resolves to whether it succeeded.
    pub fn schedule(&self, key: String) -> JoinHandle<bool> {
        let this = self.clone();
        tokio::spawn(async move { this.remove_orphan(&key).await })
    }

    async fn remove_orphan(&self, key: &str) -> bool {
        let attempts = self.config.compensation_attempts.max(1);
        for attempt in 1..=attempts {
            match bounded(
                self.config.operation_timeout(),
                "compensating remove",
                self.objects.remove(key),
            )
            .await
            {
                Ok(()) => {
                    info!(key, attempt, "Removed orphaned blob");
                    return true;
                }
                Err(e) if attempt < attempts => {
                    warn!(key, attempt, error = %e, "Compensating remove failed, retrying");
                    tokio::time::sleep(self.config.compensation_backoff()).await;
                }
                Err(e) => {
                    error!(
                        dead_letter = true,
                        key,
                        bucket = self.objects.bucket(),
                        attempts,
                        error = %e,
                        "Orphaned blob left behind"
                    );
                }
            }
        }
        false
    }
}
