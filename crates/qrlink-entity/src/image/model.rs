//! Image record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use qrlink_core::types::{ImageId, OwnerId};

/// One uploaded image: the durable link between a public id and a private blob.
///
/// Rows are immutable once created; the only lifecycle transition after
/// insert is deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ImageRecord {
    /// Opaque public handle, assigned by the record store.
    #[sqlx(try_from = "Uuid")]
    pub id: ImageId,
    /// Principal that uploaded the image.
    #[sqlx(try_from = "String")]
    pub owner_id: OwnerId,
    /// Key of the blob in the object store, prefixed by `owner_id`.
    pub storage_path: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Whether `requester` may delete or enumerate this record.
    pub fn is_owned_by(&self, requester: &OwnerId) -> bool {
        &self.owner_id == requester
    }
}
