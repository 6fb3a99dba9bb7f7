//! Integration tests for the upload path.

mod helpers;

use axum::http::StatusCode;

use helpers::{ORIGIN, TestApp, Upload};

const FIVE_MIB: usize = 5 * 1024 * 1024;

#[tokio::test]
async fn test_upload_returns_id_and_short_link() {
    let app = TestApp::new().await;

    let (id, link) = app.upload_ok(Upload::jpeg("u1", 200 * 1024)).await;

    assert_eq!(link, format!("{ORIGIN}/i/{id}"));
    assert_eq!(app.blob_count(), 1);
}

#[tokio::test]
async fn test_upload_at_exact_limit_is_accepted() {
    let app = TestApp::new().await;

    let response = app.upload(Upload::jpeg("u1", FIVE_MIB)).await;

    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_upload_one_byte_over_limit_is_too_large() {
    let app = TestApp::new().await;

    let response = app.upload(Upload::jpeg("u1", FIVE_MIB + 1)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["reason"], "TOO_LARGE");
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_body_past_router_limit_is_too_large() {
    let app = TestApp::new().await;

    let response = app.upload(Upload::jpeg("u1", 7 * 1024 * 1024)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["reason"], "TOO_LARGE");
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_declared_size_over_limit_is_rejected_before_storage() {
    let app = TestApp::new().await;
    let mut upload = Upload::jpeg("u1", 1024);
    upload.declared_size = Some(FIVE_MIB as u64 + 1);

    let response = app.upload(upload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["reason"], "TOO_LARGE");
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_unsupported_type_leaves_no_trace() {
    let app = TestApp::new().await;
    let mut upload = Upload::jpeg("u1", 1024);
    upload.mime = "application/pdf";
    upload.file_name = "doc.pdf";

    let response = app.upload(upload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["reason"], "UNSUPPORTED_TYPE");
    assert_eq!(app.blob_count(), 0);

    let listing = app.request("GET", "/api/images", Some("u1")).await;
    assert_eq!(listing.json(), serde_json::json!([]));
}

#[tokio::test]
async fn test_upload_without_owner_is_invalid_input() {
    let app = TestApp::new().await;
    let mut upload = Upload::jpeg("u1", 1024);
    upload.owner = None;

    let response = app.upload(upload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["reason"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_with_unsafe_owner_is_invalid_input() {
    let app = TestApp::new().await;

    let response = app.upload(Upload::jpeg("../etc", 1024)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["reason"], "INVALID_INPUT");
    assert_eq!(app.blob_count(), 0);
}

#[tokio::test]
async fn test_empty_file_is_invalid_input() {
    let app = TestApp::new().await;

    let response = app.upload(Upload::jpeg("u1", 0)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["reason"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_uploads_get_distinct_ids() {
    let app = TestApp::new().await;

    let (first, _) = app.upload_ok(Upload::jpeg("u1", 512)).await;
    let (second, _) = app.upload_ok(Upload::jpeg("u1", 512)).await;

    assert_ne!(first, second);
    assert_eq!(app.blob_count(), 2);
}
