//! Object store selection from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use qrlink_core::config::StorageConfig;
use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;
use qrlink_core::traits::{Clock, ObjectStore};

use crate::providers::LocalStorageProvider;

const DEFAULT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// The configured object store plus, for the local provider, the handle
/// the HTTP layer needs to serve signed `/blobs/...` requests.
#[derive(Debug, Clone)]
pub struct ConfiguredStore {
    /// Store used by the upload, delete and resolution paths.
    pub object_store: Arc<dyn ObjectStore>,
    /// Present only when blobs are served by this process.
    pub blob_server: Option<Arc<LocalStorageProvider>>,
}

/// Build the provider named by `config.provider`.
pub async fn build_object_store(
    config: &StorageConfig,
    clock: Arc<dyn Clock>,
) -> AppResult<ConfiguredStore> {
    match config.provider.as_str() {
        "local" => {
            if config.local.signing_secret == DEFAULT_SECRET {
                warn!("storage.local.signing_secret is the built-in default; set a real secret");
            }
            let local = Arc::new(LocalStorageProvider::new(&config.local, clock).await?);
            info!(root = %config.local.root_path, "Using local object store");
            Ok(ConfiguredStore {
                object_store: local.clone(),
                blob_server: Some(local),
            })
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let s3 = crate::providers::S3StorageProvider::new(&config.s3, clock).await?;
            Ok(ConfiguredStore {
                object_store: Arc::new(s3),
                blob_server: None,
            })
        }
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::configuration(
            "S3 storage requested but the `s3` feature is not enabled",
        )),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: {other}"
        ))),
    }
}
