//! Upload validation, applied before any store I/O.

use qrlink_core::config::LinkConfig;
use qrlink_core::error::{AppError, ValidationReason};
use qrlink_core::result::AppResult;

use crate::upload::orchestrator::UploadRequest;

/// Allow-list and size ceiling for uploads.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_mime_types: Vec<String>,
    max_size_bytes: u64,
}

impl UploadPolicy {
    /// Creates a policy. MIME types are compared case-insensitively.
    pub fn new(allowed_mime_types: Vec<String>, max_size_bytes: u64) -> Self {
        Self {
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .collect(),
            max_size_bytes,
        }
    }

    /// Builds the policy from link configuration.
    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(
            config.allowed_mime_types.clone(),
            config.max_upload_size_bytes,
        )
    }

    /// The inclusive size ceiling.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Media type without parameters, lowercased.
    pub fn essence(mime: &str) -> String {
        mime.split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// Reject the request unless its type is allowed and its size fits.
    pub fn check(&self, request: &UploadRequest) -> AppResult<()> {
        let mime = Self::essence(&request.declared_mime);
        if !self.allowed_mime_types.iter().any(|allowed| *allowed == mime) {
            return Err(AppError::validation(
                ValidationReason::UnsupportedType,
                format!("Unsupported file type: {}", request.declared_mime),
            ));
        }

        let actual = request.bytes.len() as u64;
        if request.declared_size > self.max_size_bytes || actual > self.max_size_bytes {
            return Err(AppError::validation(
                ValidationReason::TooLarge,
                format!(
                    "File exceeds the {} byte upload limit",
                    self.max_size_bytes
                ),
            ));
        }

        if actual == 0 {
            return Err(AppError::invalid_input("Uploaded file is empty"));
        }
        if request.declared_size != actual {
            return Err(AppError::invalid_input(format!(
                "Declared size {} does not match received {actual} bytes",
                request.declared_size
            )));
        }
        Ok(())
    }
}
