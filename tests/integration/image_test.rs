//! Integration tests for owner-scoped image management.

mod helpers;

use axum::http::StatusCode;

use helpers::{ORIGIN, TestApp, Upload};

#[tokio::test]
async fn test_list_is_newest_first_and_owner_scoped() {
    let app = TestApp::new().await;
    let (older, _) = app.upload_ok(Upload::jpeg("u1", 256)).await;
    let (newer, _) = app.upload_ok(Upload::jpeg("u1", 256)).await;
    app.upload_ok(Upload::jpeg("u2", 256)).await;

    let response = app.request("GET", "/api/images", Some("u1")).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let items = body.as_array().expect("Expected an array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], newer.as_str());
    assert_eq!(items[1]["id"], older.as_str());
    assert_eq!(items[0]["owner_id"], "u1");
    assert_eq!(items[0]["link"], format!("{ORIGIN}/i/{newer}"));
    assert!(
        items[0]["storage_path"]
            .as_str()
            .is_some_and(|p| p.starts_with("u1/") && p.ends_with(".jpg"))
    );
}

#[tokio::test]
async fn test_list_accepts_owner_query_parameter() {
    let app = TestApp::new().await;
    app.upload_ok(Upload::jpeg("u1", 256)).await;

    let response = app.request("GET", "/api/images?owner_id=u1", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_list_without_owner_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/images", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_by_other_owner_is_forbidden() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;

    let response = app
        .request("DELETE", &format!("/api/images/{id}"), Some("u2"))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["error"], "FORBIDDEN");
    assert_eq!(app.blob_count(), 1);
    app.redirect_target(&id).await;
}

#[tokio::test]
async fn test_delete_removes_link_and_blob() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let location = app.redirect_target(&id).await;

    let response = app
        .request("DELETE", &format!("/api/images/{id}"), Some("u1"))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.blob_count(), 0);

    let resolved = app.request("GET", &format!("/i/{id}"), None).await;
    assert_eq!(resolved.status, StatusCode::NOT_FOUND);
    assert!(resolved.text().contains("Image Not Found"));

    // A URL minted before the delete no longer reaches the bytes.
    assert_eq!(app.get_absolute(&location).await.status, StatusCode::NOT_FOUND);

    let listing = app.request("GET", "/api/images", Some("u1")).await;
    assert_eq!(listing.json(), serde_json::json!([]));
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let app = TestApp::new().await;
    let (id, _) = app.upload_ok(Upload::jpeg("u1", 1024)).await;
    let path = format!("/api/images/{id}");

    assert_eq!(
        app.request("DELETE", &path, Some("u1")).await.status,
        StatusCode::NO_CONTENT
    );
    let again = app.request("DELETE", &path, Some("u1")).await;

    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.json()["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_link_returns_qr_payload() {
    let app = TestApp::new().await;
    let (id, link) = app.upload_ok(Upload::jpeg("u1", 1024)).await;

    let response = app
        .request("GET", &format!("/api/images/{id}/link"), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["link"], link.as_str());
    assert_eq!(response.json()["id"], id.as_str());
}

#[tokio::test]
async fn test_get_link_for_unknown_id_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "GET",
            "/api/images/00000000-0000-0000-0000-999999999999/link",
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_both_stores() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["record_store"], true);
    assert_eq!(body["object_store"], true);
    assert_eq!(body["object_store_provider"], "local");
}
