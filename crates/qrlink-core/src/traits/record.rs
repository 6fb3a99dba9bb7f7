//! Record store trait for the durable id → storage path mapping.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::{ImageId, OwnerId};

/// Durable mapping from opaque id to (owner, storage path, creation time).
///
/// Generic over the row type so that this crate stays free of entity
/// definitions; `qrlink-entity::ImageRecord` is the only instantiation.
#[async_trait]
pub trait RecordStore<Record>: Send + Sync + std::fmt::Debug + 'static
where
    Record: Send + Sync + 'static,
{
    /// Insert a new record; the store assigns the id and creation time.
    ///
    /// Fails with `DuplicateViolation` on an id collision.
    async fn insert(&self, owner_id: &OwnerId, storage_path: &str) -> AppResult<Record>;

    /// All records of one owner, newest first.
    async fn select_by_owner(&self, owner_id: &OwnerId) -> AppResult<Vec<Record>>;

    /// Look up a record by id.
    async fn select_by_id(&self, id: &ImageId) -> AppResult<Option<Record>>;

    /// Delete a record by id. Returns `true` if a row was removed.
    async fn delete_by_id(&self, id: &ImageId) -> AppResult<bool>;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
