//! Typed path parameter helpers.

use qrlink_core::error::AppError;
use qrlink_core::types::ImageId;

/// Parse an image id from a path segment.
///
/// A malformed id cannot name a live record, so it is reported as
/// `NotFound` rather than as a validation error.
pub fn parse_image_id(s: &str) -> Result<ImageId, AppError> {
    s.parse()
        .map_err(|_| AppError::not_found(format!("Image {s} not found")))
}
