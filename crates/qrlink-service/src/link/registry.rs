//! Link registry: the only writer of the id → blob mapping.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use qrlink_core::error::{AppError, ErrorKind};
use qrlink_core::result::AppResult;
use qrlink_core::traits::{ObjectStore, RecordStore};
use qrlink_core::types::{ImageId, OwnerId};
use qrlink_entity::image::ImageRecord;

use crate::bounded::bounded;
use crate::context::RequestContext;

/// Owns create, resolve and delete of image records and their blobs.
#[derive(Debug, Clone)]
pub struct LinkRegistry {
    records: Arc<dyn RecordStore<ImageRecord>>,
    objects: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl LinkRegistry {
    /// Creates a new link registry. Every store call is bounded by `timeout`.
    pub fn new(
        records: Arc<dyn RecordStore<ImageRecord>>,
        objects: Arc<dyn ObjectStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            records,
            objects,
            timeout,
        }
    }

    /// The object store backing this registry.
    pub fn objects(&self) -> &Arc<dyn ObjectStore> {
        &self.objects
    }

    /// Per-call store timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn insert(&self, owner_id: &OwnerId, storage_path: &str) -> AppResult<ImageRecord> {
        bounded(
            self.timeout,
            "record insert",
            self.records.insert(owner_id, storage_path),
        )
        .await
    }

    /// Insert a record for a blob that has already been written.
    ///
    /// An id collision is retried once with a fresh id before the
    /// `DuplicateViolation` is returned.
    pub async fn create(&self, owner_id: &OwnerId, storage_path: &str) -> AppResult<ImageRecord> {
        let record = match self.insert(owner_id, storage_path).await {
            Err(e) if e.kind == ErrorKind::DuplicateViolation => {
                warn!(
                    owner_id = %owner_id,
                    storage_path,
                    "Image id collision, retrying with a fresh id"
                );
                self.insert(owner_id, storage_path).await?
            }
            other => other?,
        };

        info!(
            image_id = %record.id,
            owner_id = %owner_id,
            storage_path,
            "Image record created"
        );
        Ok(record)
    }

    /// Look up a record by id. Does not check ownership.
    ///
    /// A deleted id and one that never existed both yield `NotFound`.
    pub async fn resolve(&self, id: &ImageId) -> AppResult<ImageRecord> {
        bounded(self.timeout, "record lookup", self.records.select_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Image {id} not found")))
    }

    /// The requester's own records, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<ImageRecord>> {
        bounded(
            self.timeout,
            "record listing",
            self.records.select_by_owner(&ctx.owner_id),
        )
        .await
    }

    /// Delete an image on behalf of its owner.
    ///
    /// The blob is removed before the record. If blob removal fails the
    /// record stays, so the operation can simply be retried. If the record
    /// delete fails afterwards, a retry still completes because removing a
    /// missing blob succeeds.
    pub async fn delete(&self, ctx: &RequestContext, id: &ImageId) -> AppResult<()> {
        let record = self.resolve(id).await?;
        if !record.is_owned_by(&ctx.owner_id) {
            warn!(
                image_id = %id,
                requester = %ctx.owner_id,
                "Delete refused: requester does not own image"
            );
            return Err(AppError::forbidden("You do not own this image"));
        }

        if let Err(e) = bounded(
            self.timeout,
            "blob remove",
            self.objects.remove(&record.storage_path),
        )
        .await
        {
            warn!(
                image_id = %id,
                storage_path = %record.storage_path,
                error = %e,
                "Blob removal failed; record left intact"
            );
            return Err(e.into_store_unavailable());
        }

        match bounded(self.timeout, "record delete", self.records.delete_by_id(id)).await {
            Ok(true) => {
                info!(
                    image_id = %id,
                    owner_id = %ctx.owner_id,
                    storage_path = %record.storage_path,
                    "Image deleted"
                );
                Ok(())
            }
            // Lost a race with a concurrent delete of the same id.
            Ok(false) => Err(AppError::not_found(format!("Image {id} not found"))),
            Err(e) => {
                error!(
                    image_id = %id,
                    storage_path = %record.storage_path,
                    error = %e,
                    "Blob removed but record delete failed; record now points at a missing blob"
                );
                Err(e.into_store_unavailable())
            }
        }
    }

    /// Reachability of both stores.
    pub async fn health(&self) -> (AppResult<bool>, AppResult<bool>) {
        let records = bounded(self.timeout, "record health", self.records.health_check()).await;
        let objects = bounded(self.timeout, "object health", self.objects.health_check()).await;
        (records, objects)
    }
}
