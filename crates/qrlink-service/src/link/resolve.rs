//! Resolution of a short link to a time-limited access URL.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use qrlink_core::error::ErrorKind;
use qrlink_core::result::AppResult;
use qrlink_core::traits::SignedUrl;
use qrlink_core::types::ImageId;

use crate::bounded::bounded;
use crate::link::registry::LinkRegistry;

/// Outcome of resolving an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A freshly minted URL for the image.
    Found(SignedUrl),
    /// No live image behind this id.
    NotFound,
}

/// The public redirect path hit when a QR code is scanned.
#[derive(Debug, Clone)]
pub struct ResolutionService {
    registry: Arc<LinkRegistry>,
    ttl: Duration,
}

impl ResolutionService {
    /// Creates a resolution service minting URLs valid for `ttl`.
    pub fn new(registry: Arc<LinkRegistry>, ttl: Duration) -> Self {
        Self { registry, ttl }
    }

    /// Lifetime of each minted URL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a signed URL for the image behind `id`.
    ///
    /// Every call mints a new URL. Only store outages are errors; an id
    /// with no record, or a record whose blob is gone, is `NotFound`.
    pub async fn get_access_url(&self, id: &ImageId) -> AppResult<Resolution> {
        let record = match self.registry.resolve(id).await {
            Ok(record) => record,
            Err(e) if e.kind == ErrorKind::NotFound => return Ok(Resolution::NotFound),
            Err(e) => return Err(e),
        };

        let signed = bounded(
            self.registry.timeout(),
            "sign url",
            self.registry
                .objects()
                .sign_url(&record.storage_path, self.ttl),
        )
        .await;

        match signed {
            Ok(url) => {
                debug!(image_id = %id, expires_at = %url.expires_at, "Minted access URL");
                Ok(Resolution::Found(url))
            }
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(
                    image_id = %id,
                    storage_path = %record.storage_path,
                    "Record has no blob; treating as not found"
                );
                Ok(Resolution::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}
