//! Request DTOs.

use serde::Deserialize;

/// Query parameters carried by a signed blob URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignedBlobQuery {
    /// Unix timestamp after which the URL is rejected.
    pub expires: Option<i64>,
    /// URL-safe base64 signature.
    pub signature: Option<String>,
}

/// Owner selection via query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerQuery {
    /// Requesting owner when no `x-owner-id` header is present.
    pub owner_id: Option<String>,
}
