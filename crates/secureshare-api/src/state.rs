//! Application state shared across all handlers.

use std::sync::Arc;

use secureshare_auth::JwtDecoder;
use secureshare_core::config::AppConfig;
use secureshare_core::traits::object_store::ObjectStore;
use secureshare_database::MetadataStore;
use secureshare_service::{
    AccessTokenManager, ListingAggregator, TokenGenerator, TransferCoordinator,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Blob store handle.
    pub objects: Arc<dyn ObjectStore>,
    /// Metadata store handle.
    pub records: Arc<dyn MetadataStore>,
    /// Bearer token verifier.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Upload / delete coordination.
    pub coordinator: Arc<TransferCoordinator>,
    /// Download token issuance and validation.
    pub access: Arc<AccessTokenManager>,
    /// Owner file listing.
    pub listing: Arc<ListingAggregator>,
}

impl AppState {
    /// Wire the services over the given stores.
    pub fn new(
        config: AppConfig,
        objects: Arc<dyn ObjectStore>,
        records: Arc<dyn MetadataStore>,
    ) -> Self {
        let tokens = TokenGenerator::new();
        let transfer = config.transfer.clone();

        let coordinator = TransferCoordinator::new(
            objects.clone(),
            records.clone(),
            tokens,
            transfer.clone(),
            config.storage.max_upload_size_bytes,
        );
        let access =
            AccessTokenManager::new(objects.clone(), records.clone(), tokens, transfer.clone());
        let listing = ListingAggregator::new(objects.clone(), records.clone(), transfer);

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            config: Arc::new(config),
            objects,
            records,
            coordinator: Arc::new(coordinator),
            access: Arc::new(access),
            listing: Arc::new(listing),
        }
    }
}
