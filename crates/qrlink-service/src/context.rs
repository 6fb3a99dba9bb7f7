//! Request context carrying the acting owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qrlink_core::types::OwnerId;

/// Context for the current request.
///
/// Built by the HTTP layer from the authenticated principal and passed
/// into every owner-scoped service call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The principal performing the operation.
    pub owner_id: OwnerId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            request_time: Utc::now(),
        }
    }
}
