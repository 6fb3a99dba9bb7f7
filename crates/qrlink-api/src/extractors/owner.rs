//! `Owner` extractor: the principal an authenticating gateway vouched for.

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Query};
use axum::http::request::Parts;

use qrlink_core::error::AppError;
use qrlink_core::types::OwnerId;
use qrlink_service::RequestContext;

use crate::dto::request::OwnerQuery;
use crate::error::ApiError;

/// Header set by the gateway in front of this service.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Extracted owner context available in handlers.
#[derive(Debug, Clone)]
pub struct Owner(pub RequestContext);

impl std::ops::Deref for Owner {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Parse and validate an owner id supplied by a client.
pub fn parse_owner(raw: &str) -> Result<OwnerId, AppError> {
    OwnerId::parse(raw.trim()).map_err(|e| AppError::invalid_input(format!("Invalid owner id: {e}")))
}

/// The `x-owner-id` header, falling back to the `owner_id` query parameter.
fn owner_from_parts(parts: &Parts) -> Result<Option<OwnerId>, AppError> {
    if let Some(value) = parts.headers.get(OWNER_HEADER) {
        let raw = value
            .to_str()
            .map_err(|_| AppError::invalid_input("Invalid x-owner-id header"))?;
        return parse_owner(raw).map(Some);
    }

    let Query(query) = Query::<OwnerQuery>::try_from_uri(&parts.uri)
        .map_err(|e| AppError::invalid_input(format!("Invalid query string: {e}")))?;
    query.owner_id.as_deref().map(parse_owner).transpose()
}

impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner_id = owner_from_parts(parts)?
            .ok_or_else(|| AppError::invalid_input("owner_id is required"))?;
        Ok(Self(RequestContext::new(owner_id)))
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(owner_from_parts(parts)?.map(|id| Self(RequestContext::new(id))))
    }
}
