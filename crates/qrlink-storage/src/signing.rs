//! HMAC-SHA256 signatures for locally served blob URLs.
//!
//! A signature covers `"{path}\n{expires}"` where `expires` is a unix
//! timestamp in seconds. It is encoded as unpadded URL-safe base64.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies `(path, expires)` pairs with a shared secret.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Create a signer. An empty secret is a configuration error.
    pub fn new(secret: &str) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::configuration(
                "storage.local.signing_secret must not be empty",
            ));
        }
        Ok(Self {
            secret: secret.as_bytes().to_vec(),
        })
    }

    fn mac(&self, path: &str, expires: i64) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid signing key: {e}")))?;
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    /// Produce the encoded signature for a path and expiry.
    pub fn sign(&self, path: &str, expires: i64) -> AppResult<String> {
        let tag = self.mac(path, expires)?.finalize().into_bytes();
        Ok(URL_SAFE_NO_PAD.encode(tag))
    }

    /// Check a presented signature in constant time.
    ///
    /// Any mismatch, including undecodable input, is `Forbidden`.
    pub fn verify(&self, path: &str, expires: i64, signature: &str) -> AppResult<()> {
        let presented = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AppError::forbidden("Malformed signature"))?;
        self.mac(path, expires)?
            .verify_slice(&presented)
            .map_err(|_| AppError::forbidden("Invalid signature"))
    }
}
