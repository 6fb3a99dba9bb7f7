//! Upload orchestration: validate, write the blob, then record it.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;
use qrlink_core::traits::Clock;
use qrlink_core::types::OwnerId;
use qrlink_entity::image::ImageRecord;
use qrlink_storage::mime;

use crate::bounded::bounded;
use crate::context::RequestContext;
use crate::link::registry::LinkRegistry;
use crate::upload::policy::UploadPolicy;

/// An image submitted for upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// The raw file contents.
    pub bytes: Bytes,
    /// Content type claimed by the client.
    pub declared_mime: String,
    /// Size claimed by the client.
    pub declared_size: u64,
    /// Original file name, used for the stored extension.
    pub file_name: Option<String>,
}

impl UploadRequest {
    /// Build a request whose declared size is the received length.
    pub fn new(bytes: Bytes, declared_mime: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            declared_size: bytes.len() as u64,
            bytes,
            declared_mime: declared_mime.into(),
            file_name,
        }
    }

    /// Override the declared size.
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }
}

/// Validates and persists new images.
#[derive(Debug, Clone)]
pub struct UploadOrchestrator {
    registry: Arc<LinkRegistry>,
    policy: UploadPolicy,
    clock: Arc<dyn Clock>,
}

impl UploadOrchestrator {
    /// Creates a new upload orchestrator.
    pub fn new(registry: Arc<LinkRegistry>, policy: UploadPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            policy,
            clock,
        }
    }

    /// The active upload policy.
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Store a new image for the requesting owner.
    ///
    /// The blob is written first and the record inserted only after the
    /// write is acknowledged. If the write is not acknowledged or the
    /// insert fails, the blob is removed again on a best-effort basis and
    /// `StoreUnavailable` is returned whether or not that cleanup succeeds.
    pub async fn upload(&self, ctx: &RequestContext, request: UploadRequest) -> AppResult<ImageRecord> {
        self.policy.check(&request)?;

        let storage_path = self.storage_path(&ctx.owner_id, &request);
        let size = request.bytes.len();
        let objects = self.registry.objects();
        let timeout = self.registry.timeout();

        if let Err(primary) = bounded(timeout, "blob put", objects.put(&storage_path, request.bytes)).await {
            // The write may have landed even though it was not acknowledged.
            self.discard_blob(ctx, &storage_path, &primary, "Blob write failed")
                .await;
            return Err(primary.into_store_unavailable());
        }

        match self.registry.create(&ctx.owner_id, &storage_path).await {
            Ok(record) => {
                info!(
                    image_id = %record.id,
                    owner_id = %ctx.owner_id,
                    storage_path = %storage_path,
                    bytes = size,
                    "Image uploaded"
                );
                Ok(record)
            }
            Err(primary) => {
                self.discard_blob(ctx, &storage_path, &primary, "Record insert failed")
                    .await;
                Err(primary.into_store_unavailable())
            }
        }
    }

    /// Best-effort removal of a blob that has no record. A failure is
    /// logged with `orphaned_path` for offline reconciliation.
    async fn discard_blob(
        &self,
        ctx: &RequestContext,
        storage_path: &str,
        primary: &AppError,
        stage: &str,
    ) {
        let objects = self.registry.objects();
        match bounded(self.registry.timeout(), "blob remove", objects.remove(storage_path)).await {
            Ok(()) => warn!(
                owner_id = %ctx.owner_id,
                storage_path,
                error = %primary,
                "{stage}; uploaded blob removed"
            ),
            Err(cleanup) => error!(
                owner_id = %ctx.owner_id,
                orphaned_path = storage_path,
                error = %primary,
                cleanup_error = %cleanup,
                "{stage} and blob cleanup failed; blob orphaned"
            ),
        }
    }

    /// `{owner_id}/{unix_millis}-{32 hex}.{ext}`.
    fn storage_path(&self, owner_id: &OwnerId, request: &UploadRequest) -> String {
        let millis = self.clock.now().timestamp_millis();
        let suffix = Uuid::new_v4().simple();
        let ext = extension(request);
        format!("{owner_id}/{millis}-{suffix}.{ext}")
    }
}

/// Extension from the file name when it is short and alphanumeric,
/// otherwise the canonical one for the declared type.
fn extension(request: &UploadRequest) -> String {
    let from_name = request
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| (1..=8).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        mime::extension_for(&UploadPolicy::essence(&request.declared_mime))
            .unwrap_or("bin")
            .to_string()
    })
}
