//! Integration tests for short-link resolution and signed blob access.

mod helpers;

use axum::http::StatusCode;

use helpers::{ORIGIN, TestApp, Upload};

#[tokio::test]
async fn test_redirect_serves_uploaded_bytes() {
    let app = TestApp::new().await;
    let upload = Upload::jpeg("u1", 200 * 1024);
    let original = upload.bytes.clone();
    let (id, _) = app.upload_ok(upload).await;

    let response = app.request("GET", &format!("/i/{id}"), None).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("cache-control").as_deref(), Some("no-store"));
    let location = response.header("location").expect("No Location header");
    assert!(location.starts_with(&format!("{ORIGIN}/blobs/u1/")));

    let blob = app.get_absolute(&location).await;
    assert_eq!(blob.status, StatusCode::OK);
    assert_eq!(blob.header("content-type").as_deref(), Some("image/jpeg"));
    assert_eq!(blob.header("cache-control").as_deref(), Some("no-store"));
    assert_eq!(blob.body, original);
}

#[tokio::test]
async fn test_signed_url_valid_until_ttl() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let location = app.redirect_target(&id).await;

    app.advance_secs(599);

    assert_eq!(app.get_absolute(&location).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_signed_url_rejected_after_ttl() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let location = app.redirect_target(&id).await;

    app.advance_secs(601);

    assert_eq!(app.get_absolute(&location).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_each_scan_mints_a_fresh_url() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let stale = app.redirect_target(&id).await;

    app.advance_secs(601);
    let fresh = app.redirect_target(&id).await;

    assert_ne!(stale, fresh);
    assert_eq!(app.get_absolute(&stale).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get_absolute(&fresh).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_tampered_signature_is_forbidden() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let location = app.redirect_target(&id).await;

    let (base, _) = location
        .split_once("&signature=")
        .expect("No signature in URL");
    let forged = format!("{base}&signature=AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");

    assert_eq!(app.get_absolute(&forged).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blob_without_signature_is_forbidden() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let location = app.redirect_target(&id).await;

    let (unsigned, _) = location.split_once('?').expect("No query in URL");

    assert_eq!(app.get_absolute(unsigned).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_show_the_same_page() {
    let app = TestApp::new().await;

    let unknown = app
        .request("GET", "/i/00000000-0000-0000-0000-999999999999", None)
        .await;
    let malformed = app.request("GET", "/i/not-an-id", None).await;

    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body, malformed.body);
    assert!(unknown.text().contains("Image Not Found"));
    assert_eq!(unknown.header("cache-control").as_deref(), Some("no-store"));
    assert!(unknown.header("location").is_none());
}

#[tokio::test]
async fn test_resolution_needs_no_owner() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;

    let response = app.request("GET", &format!("/i/{id}"), Some("u2")).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
}
