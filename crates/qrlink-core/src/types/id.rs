//! Typed identifiers for images and their owners.
//!
//! [`ImageId`] is the opaque public handle embedded in every shared link;
//! it wraps a UUIDv4 (122 random bits). [`OwnerId`] names the
//! authenticated principal and doubles as the first segment of every
//! storage path, so it is restricted to path-safe characters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, immutable identifier of an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub Uuid);

impl ImageId {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the inner UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }

    /// Return a reference to the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for ImageId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ImageId> for Uuid {
    fn from(id: ImageId) -> Uuid {
        id.0
    }
}

/// Maximum accepted owner id length.
const MAX_OWNER_ID_LEN: usize = 128;

/// Rejected owner id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OwnerIdError {
    /// The id is empty.
    #[error("owner id must not be empty")]
    Empty,
    /// The id is longer than [`MAX_OWNER_ID_LEN`].
    #[error("owner id must be at most 128 characters")]
    TooLong,
    /// The id contains a character that is unsafe in a storage path.
    #[error("owner id contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The id starts with a dot.
    #[error("owner id must not start with '.'")]
    LeadingDot,
}

/// Identifier of the authenticated principal owning a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validate and wrap an owner id.
    pub fn parse(value: impl Into<String>) -> Result<Self, OwnerIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(OwnerIdError::Empty);
        }
        if value.len() > MAX_OWNER_ID_LEN {
            return Err(OwnerIdError::TooLong);
        }
        if value.starts_with('.') {
            return Err(OwnerIdError::LeadingDot);
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@')))
        {
            return Err(OwnerIdError::InvalidCharacter(bad));
        }
        Ok(Self(value))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OwnerId {
    type Err = OwnerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = OwnerIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> String {
        id.0
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
