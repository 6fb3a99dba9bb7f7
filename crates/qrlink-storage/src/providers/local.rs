//! Local filesystem object store.
//!
//! Blobs live under a root directory. Since a filesystem has no native
//! URL signing, access URLs point back at this service's `/blobs/...`
//! route and carry an expiry plus an HMAC signature that
//! [`LocalStorageProvider::open_signed`] checks before serving bytes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use qrlink_core::config::LocalStorageConfig;
use qrlink_core::error::{AppError, ErrorKind};
use qrlink_core::result::AppResult;
use qrlink_core::traits::{Clock, ObjectStore, SignedUrl};

use crate::path;
use crate::signing::UrlSigner;

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    root: PathBuf,
    public_base_url: String,
    signer: UrlSigner,
    clock: Arc<dyn Clock>,
}

impl LocalStorageProvider {
    /// Create a provider rooted at `config.root_path`, creating the directory if needed.
    pub async fn new(config: &LocalStorageConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            signer: UrlSigner::new(&config.signing_secret)?,
            clock,
        })
    }

    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        path::validate(path)?;
        Ok(self.root.join(path))
    }

    /// Serve the bytes of a blob after checking its signed access parameters.
    ///
    /// Fails with `Forbidden` when the signature does not match or the
    /// expiry has passed, and with `NotFound` when the blob is gone.
    pub async fn open_signed(&self, path: &str, expires: i64, signature: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        self.signer.verify(path, expires, signature)?;
        if self.clock.now().timestamp() >= expires {
            return Err(AppError::forbidden("Signed URL has expired"));
        }

        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    format!("Failed to read blob: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl ObjectStore for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to write blob: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Removed blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to remove blob: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to stat blob: {path}"),
                e,
            )
        })
    }

    async fn sign_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl> {
        if !self.exists(path).await? {
            return Err(AppError::not_found(format!("Blob not found: {path}")));
        }

        let (expires, expires_at) = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| self.clock.now().timestamp().checked_add(secs))
            .and_then(|expires| Some((expires, DateTime::<Utc>::from_timestamp(expires, 0)?)))
            .ok_or_else(|| AppError::configuration("Signed URL lifetime is out of range"))?;
        let signature = self.signer.sign(path, expires)?;

        Ok(SignedUrl {
            url: format!(
                "{}/blobs/{path}?expires={expires}&signature={signature}",
                self.public_base_url
            ),
            expires_at,
        })
    }
}
