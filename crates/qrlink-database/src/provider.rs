//! Record store selection from configuration.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use qrlink_core::config::DatabaseConfig;
use qrlink_core::error::AppError;
use qrlink_core::traits::RecordStore;
use qrlink_entity::image::ImageRecord;

use crate::connection::connect;
use crate::migration::run_migrations;
use crate::repositories::{MemoryImageRepository, PgImageRepository};

/// Shared handle to the configured record store.
pub type ImageStore = Arc<dyn RecordStore<ImageRecord>>;

/// Build the record store named by `config.provider`.
///
/// For PostgreSQL this connects, applies pending migrations and also
/// returns the pool so the caller can close it on shutdown.
pub async fn build_record_store(
    config: &DatabaseConfig,
) -> Result<(ImageStore, Option<PgPool>), AppError> {
    match config.provider.as_str() {
        "postgres" => {
            let pool = connect(config).await?;
            run_migrations(&pool).await?;
            let store: ImageStore = Arc::new(PgImageRepository::new(pool.clone()));
            Ok((store, Some(pool)))
        }
        "memory" => {
            info!("Using in-memory record store; records will not survive a restart");
            Ok((Arc::new(MemoryImageRepository::new()), None))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider: {other}"
        ))),
    }
}
