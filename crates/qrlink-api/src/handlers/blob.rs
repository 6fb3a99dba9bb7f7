//! Serving locally stored blobs behind signed URLs.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use qrlink_core::error::AppError;
use qrlink_storage::mime;

use crate::dto::request::SignedBlobQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /blobs/{*path}?expires=&signature=
pub async fn serve_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<SignedBlobQuery>,
) -> Result<Response, ApiError> {
    let server = state
        .blob_server
        .as_ref()
        .ok_or_else(|| AppError::not_found("Blobs are not served by this instance"))?;

    let (Some(expires), Some(signature)) = (query.expires, query.signature.as_deref()) else {
        return Err(AppError::forbidden("Missing signature").into());
    };

    let data = server.open_signed(&path, expires, signature).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::from_path(&path))
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}
