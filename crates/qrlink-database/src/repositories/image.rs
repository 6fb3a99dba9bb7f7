//! PostgreSQL-backed image record repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use qrlink_core::result::AppResult;
use qrlink_core::traits::RecordStore;
use qrlink_core::types::{ImageId, OwnerId};
use qrlink_entity::image::ImageRecord;

use crate::error::map_sqlx_error;

const COLUMNS: &str = "id, owner_id, storage_path, created_at";

/// Repository for the `images` table.
#[derive(Debug, Clone)]
pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    /// Create a new image repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<ImageRecord> for PgImageRepository {
    async fn insert(&self, owner_id: &OwnerId, storage_path: &str) -> AppResult<ImageRecord> {
        let id = ImageId::new();
        let sql = format!(
            "INSERT INTO images (id, owner_id, storage_path) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImageRecord>(&sql)
            .bind(id.into_uuid())
            .bind(owner_id.as_str())
            .bind(storage_path)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to insert image", e))
    }

    async fn select_by_owner(&self, owner_id: &OwnerId) -> AppResult<Vec<ImageRecord>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM images WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ImageRecord>(&sql)
            .bind(owner_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to list images", e))
    }

    async fn select_by_id(&self, id: &ImageId) -> AppResult<Option<ImageRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, ImageRecord>(&sql)
            .bind(Uuid::from(*id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find image", e))
    }

    async fn delete_by_id(&self, id: &ImageId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(Uuid::from(*id))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete image", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| map_sqlx_error("Record store health check failed", e))
    }
}
