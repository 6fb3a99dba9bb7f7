//! Short-link, signed-access and upload policy configuration.

use serde::{Deserialize, Serialize};

/// Settings governing link derivation, signed URL lifetime and uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Public site address that `/i/{id}` links are built on.
    #[serde(default = "default_base_address")]
    pub base_address: String,
    /// Lifetime of a minted signed URL, in seconds.
    #[serde(default = "default_ttl")]
    pub signed_url_ttl_seconds: u64,
    /// Upload ceiling in bytes (inclusive).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Raster image MIME types accepted for upload.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    /// Caller-side retries for transient store failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base backoff between caller-side retries, in milliseconds (doubles per attempt).
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_address: default_base_address(),
            signed_url_ttl_seconds: default_ttl(),
            max_upload_size_bytes: default_max_upload(),
            allowed_mime_types: default_allowed_mime_types(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_base_address() -> String {
    "http://localhost:8080".to_string()
}

fn default_ttl() -> u64 {
    600
}

fn default_max_upload() -> u64 {
    5_242_880 // 5 MiB
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    100
}
