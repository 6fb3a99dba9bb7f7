//! S3-compatible object store (requires the `s3` feature).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use qrlink_core::config::S3StorageConfig;
use qrlink_core::error::{AppError, ErrorKind};
use qrlink_core::result::AppResult;
use qrlink_core::traits::{Clock, ObjectStore, SignedUrl};

use crate::{mime, path};

/// S3-compatible storage provider.
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: Client,
    bucket: String,
    clock: Arc<dyn Clock>,
}

fn unavailable(message: String, err: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::with_source(ErrorKind::StoreUnavailable, message, err)
}

impl S3StorageProvider {
    /// Create a provider from configuration.
    ///
    /// Static credentials are used when `access_key` is set; otherwise the
    /// default AWS credential chain applies.
    pub async fn new(config: &S3StorageConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 storage provider"
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "qrlink-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            clock,
        })
    }
}

#[async_trait]
impl ObjectStore for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| true)
            .map_err(|e| unavailable(format!("S3 bucket {} unreachable", self.bucket), e))
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        path::validate(path)?;
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(mime::from_path(path))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| unavailable(format!("Failed to put object: {path}"), e))?;
        debug!(path, bytes = len, "Wrote object");
        Ok(())
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        path::validate(path)?;
        // S3 reports success when deleting a missing key.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| unavailable(format!("Failed to delete object: {path}"), e))?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        path::validate(path)?;
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(unavailable(format!("Failed to stat object: {path}"), e)),
        }
    }

    async fn sign_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl> {
        if !self.exists(path).await? {
            return Err(AppError::not_found(format!("Blob not found: {path}")));
        }

        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Invalid signed URL lifetime",
                e,
            )
        })?;
        let expires_at = self.clock.now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid signed URL lifetime", e))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(|e| unavailable(format!("Failed to presign object: {path}"), e))?;

        Ok(SignedUrl {
            url: request.uri().to_string(),
            expires_at,
        })
    }
}
