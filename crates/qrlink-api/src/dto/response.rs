//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qrlink_core::types::{ImageId, OwnerId};
use qrlink_entity::image::ImageRecord;
use qrlink_service::LinkBuilder;

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// The new image id.
    pub id: ImageId,
    /// Shareable link, also the QR payload.
    pub link: String,
}

/// One entry of an owner's image listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Image id.
    pub id: ImageId,
    /// Owner id.
    pub owner_id: OwnerId,
    /// Object store key.
    pub storage_path: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Shareable link.
    pub link: String,
}

impl ImageSummary {
    /// Build a summary from a record.
    pub fn from_record(record: ImageRecord, links: &LinkBuilder) -> Self {
        Self {
            link: links.link_for(&record.id),
            id: record.id,
            owner_id: record.owner_id,
            storage_path: record.storage_path,
            created_at: record.created_at,
        }
    }
}

/// The QR payload for one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    /// Image id.
    pub id: ImageId,
    /// Shareable link.
    pub link: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Whether the record store answered.
    pub record_store: bool,
    /// Whether the object store answered.
    pub object_store: bool,
    /// Object store provider name.
    pub object_store_provider: String,
}
