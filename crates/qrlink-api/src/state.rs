//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use qrlink_core::config::AppConfig;
use qrlink_core::traits::{Clock, RecordStore};
use qrlink_entity::image::ImageRecord;
use qrlink_service::{
    LinkBuilder, LinkRegistry, ResolutionService, RetryPolicy, UploadOrchestrator, UploadPolicy,
};
use qrlink_storage::{ConfiguredStore, LocalStorageProvider};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped or small, so cloning per request is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Owner of the id → blob mapping.
    pub registry: Arc<LinkRegistry>,
    /// Signed URL minting for `/i/{id}`.
    pub resolver: Arc<ResolutionService>,
    /// Upload validation and persistence.
    pub uploader: Arc<UploadOrchestrator>,
    /// Shareable link derivation.
    pub links: LinkBuilder,
    /// Caller-side retry for transient store failures.
    pub retry: RetryPolicy,
    /// Serves `/blobs/...` when the local provider is active.
    pub blob_server: Option<Arc<LocalStorageProvider>>,
}

impl AppState {
    /// Wire the core services from configuration and the two stores.
    pub fn new(
        config: AppConfig,
        records: Arc<dyn RecordStore<ImageRecord>>,
        store: ConfiguredStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let timeout = Duration::from_secs(config.storage.operation_timeout_seconds);
        let registry = Arc::new(LinkRegistry::new(records, store.object_store, timeout));
        let resolver = Arc::new(ResolutionService::new(
            Arc::clone(&registry),
            Duration::from_secs(config.links.signed_url_ttl_seconds),
        ));
        let uploader = Arc::new(UploadOrchestrator::new(
            Arc::clone(&registry),
            UploadPolicy::from_config(&config.links),
            clock,
        ));

        Self {
            links: LinkBuilder::new(config.links.base_address.clone()),
            retry: RetryPolicy::from_config(&config.links),
            config: Arc::new(config),
            registry,
            resolver,
            uploader,
            blob_server: store.blob_server,
        }
    }
}
