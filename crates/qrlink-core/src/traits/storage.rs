//! Object store trait for pluggable blob backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A time-limited URL granting read access to one stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl {
    /// The URL a browser can be redirected to.
    pub url: String,
    /// Instant after which the object store rejects the URL.
    pub expires_at: DateTime<Utc>,
}

/// Trait for blob storage backends.
///
/// Paths are owner-scoped keys such as `{owner_id}/{file}`. The trait is
/// defined here in `qrlink-core` and implemented in `qrlink-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes to a blob at the given path.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Remove the blob at the given path. Removing a missing path is not an error.
    async fn remove(&self, path: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Mint a read URL for `path` that expires `ttl` from now.
    ///
    /// Fails with `NotFound` when no blob exists at `path`.
    async fn sign_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl>;
}
