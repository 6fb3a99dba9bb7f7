//! Shareable link derivation.
//!
//! The link is the exact string encoded into the QR symbol. It is a
//! pure function of the configured base address and the image id and is
//! never persisted.

use qrlink_core::types::ImageId;

/// Build `{base_address}/i/{id}`, dropping any trailing `/` from the base.
pub fn link_for(base_address: &str, id: &ImageId) -> String {
    format!("{}/i/{id}", base_address.trim_end_matches('/'))
}

/// Derives links against one configured base address.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_address: String,
}

impl LinkBuilder {
    /// Creates a link builder.
    pub fn new(base_address: impl Into<String>) -> Self {
        let base_address: String = base_address.into();
        Self {
            base_address: base_address.trim_end_matches('/').to_string(),
        }
    }

    /// The normalized base address.
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// The shareable link for an image.
    pub fn link_for(&self, id: &ImageId) -> String {
        link_for(&self.base_address, id)
    }
}
