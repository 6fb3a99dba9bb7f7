//! Upload, listing, deletion and link lookup for an owner's images.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use bytes::Bytes;

use qrlink_core::error::{AppError, ValidationReason};
use qrlink_service::{RequestContext, UploadRequest};

use crate::dto::response::{ImageSummary, LinkResponse, UploadResponse};
use crate::error::ApiError;
use crate::extractors::owner::parse_owner;
use crate::extractors::{Owner, parse_image_id};
use crate::state::AppState;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation(ValidationReason::TooLarge, "Upload exceeds the size limit")
    } else {
        AppError::invalid_input(format!("Multipart error: {e}"))
    }
}

/// POST /api/images (multipart: `owner_id`, `file`, optional `size`)
pub async fn upload_image(
    State(state): State<AppState>,
    owner: Option<Owner>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut form_owner = None;
    let mut declared_size: Option<u64> = None;
    let mut file: Option<(Bytes, String, Option<String>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "owner_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                form_owner = Some(parse_owner(&text)?);
            }
            "size" => {
                let text = field.text().await.map_err(multipart_error)?;
                declared_size = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::invalid_input("size must be a byte count"))?,
                );
            }
            "file" => {
                let file_name = field.file_name().map(String::from);
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((data, mime, file_name));
            }
            _ => {}
        }
    }

    let ctx = match (owner, form_owner) {
        (Some(Owner(ctx)), _) => ctx,
        (None, Some(owner_id)) => RequestContext::new(owner_id),
        (None, None) => return Err(AppError::invalid_input("owner_id is required").into()),
    };
    let (data, mime, file_name) =
        file.ok_or_else(|| AppError::invalid_input("file field is required"))?;

    let mut request = UploadRequest::new(data, mime, file_name);
    if let Some(size) = declared_size {
        request = request.with_declared_size(size);
    }

    let record = state.uploader.upload(&ctx, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            link: state.links.link_for(&record.id),
            id: record.id,
        }),
    ))
}

/// GET /api/images?owner_id=
pub async fn list_images(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<Vec<ImageSummary>>, ApiError> {
    let records = state.registry.list(&owner).await?;
    Ok(Json(
        records
            .into_iter()
            .map(|r| ImageSummary::from_record(r, &state.links))
            .collect(),
    ))
}

/// DELETE /api/images/{id}?owner_id=
pub async fn delete_image(
    State(state): State<AppState>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_image_id(&id)?;
    state.registry.delete(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/images/{id}/link
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LinkResponse>, ApiError> {
    let id = parse_image_id(&id)?;
    let record = state.registry.resolve(&id).await?;
    Ok(Json(LinkResponse {
        link: state.links.link_for(&record.id),
        id: record.id,
    }))
}
