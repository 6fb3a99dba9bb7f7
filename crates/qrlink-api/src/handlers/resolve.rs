//! The public short-link redirect.

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use qrlink_core::error::AppError;
use qrlink_service::Resolution;
use qrlink_service::retry::with_backoff;

use crate::error::ApiError;
use crate::extractors::parse_image_id;
use crate::state::AppState;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html>
<html lang=\"en\">
<head><meta charset=\"utf-8\"><title>Image Not Found</title></head>
<body>
<h1>Image Not Found</h1>
<p>This link does not point to an image. It may have been deleted.</p>
</body>
</html>
";

fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// The stable not-found page. Never-existed and deleted ids look the same.
pub fn not_found_page() -> Response {
    no_store((StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response())
}

/// GET /i/{id}
///
/// Redirects to a freshly minted signed URL. Transient store failures are
/// retried with backoff before surfacing as 503.
pub async fn resolve_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(id) = parse_image_id(&id) else {
        return Ok(not_found_page());
    };

    let resolver = state.resolver.as_ref();
    let id = &id;
    let outcome = with_backoff(state.retry, "resolve", move || resolver.get_access_url(id)).await?;

    match outcome {
        Resolution::Found(signed) => {
            let location = HeaderValue::from_str(&signed.url)
                .map_err(|_| AppError::internal("Signed URL is not a valid header"))?;
            let mut response = StatusCode::TEMPORARY_REDIRECT.into_response();
            response.headers_mut().insert(header::LOCATION, location);
            Ok(no_store(response))
        }
        Resolution::NotFound => Ok(not_found_page()),
    }
}
