//! Shared test helpers for integration tests.
//!
//! Each `TestApp` runs the full router against an in-memory record store
//! and a local object store rooted in a fresh temp dir, with a manual
//! clock so signed URL expiry can be exercised.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use qrlink_core::config::AppConfig;
use qrlink_core::traits::{Clock, ManualClock};
use qrlink_database::MemoryImageRepository;

/// Origin used for both short links and blob URLs in tests.
pub const ORIGIN: &str = "http://localhost:8080";

const BOUNDARY: &str = "qrlink-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Frozen clock shared by the object store and the upload path
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
    dir: TempDir,
}

/// A file part for a multipart upload.
pub struct Upload<'a> {
    pub owner: Option<&'a str>,
    pub bytes: Vec<u8>,
    pub mime: &'a str,
    pub file_name: &'a str,
    pub declared_size: Option<u64>,
}

impl<'a> Upload<'a> {
    /// A JPEG upload from `owner` with `len` bytes of content.
    pub fn jpeg(owner: &'a str, len: usize) -> Self {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend((0..len.saturating_sub(4)).map(|i| (i % 251) as u8));
        bytes.truncate(len);
        Self {
            owner: Some(owner),
            bytes,
            mime: "image/jpeg",
            file_name: "photo.jpg",
            declared_size: None,
        }
    }
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.storage.local.root_path = dir.path().to_string_lossy().into_owned();
        config.storage.local.signing_secret = "integration-secret".to_string();
        config.storage.local.public_base_url = ORIGIN.to_string();
        config.links.base_address = ORIGIN.to_string();
        config.links.retry_backoff_ms = 1;

        let clock = Arc::new(ManualClock::default());
        let shared_clock: Arc<dyn Clock> = clock.clone();

        let store = qrlink_storage::build_object_store(&config.storage, Arc::clone(&shared_clock))
            .await
            .expect("Failed to init object store");
        let records = Arc::new(MemoryImageRepository::new());

        let state = qrlink_api::AppState::new(config.clone(), records, store, shared_clock);
        let router = qrlink_api::build_router(state);

        Self {
            router,
            clock,
            config,
            dir,
        }
    }

    /// Move the shared clock forward.
    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }

    /// Number of blobs currently on disk.
    pub fn blob_count(&self) -> usize {
        fn walk(path: &std::path::Path) -> usize {
            std::fs::read_dir(path)
                .map(|entries| {
                    entries
                        .filter_map(Result::ok)
                        .map(|e| {
                            let p = e.path();
                            if p.is_dir() { walk(&p) } else { 1 }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        walk(self.dir.path())
    }

    /// Send a multipart upload to `POST /api/images`.
    pub async fn upload(&self, upload: Upload<'_>) -> TestResponse {
        let mut body = Vec::new();
        if let Some(owner) = upload.owner {
            push_text_field(&mut body, "owner_id", owner);
        }
        if let Some(size) = upload.declared_size {
            push_text_field(&mut body, "size", &size.to_string());
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                upload.file_name, upload.mime
            )
            .as_bytes(),
        );
        body.extend_from_slice(&upload.bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/images")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload and return the new `(id, link)`, asserting success.
    pub async fn upload_ok(&self, upload: Upload<'_>) -> (String, String) {
        let response = self.upload(upload).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.json()
        );
        let body = response.json();
        (
            body["id"].as_str().expect("No id").to_string(),
            body["link"].as_str().expect("No link").to_string(),
        )
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, owner: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(owner) = owner {
            req = req.header("x-owner-id", owner);
        }
        let req = req.body(Body::empty()).expect("Failed to build request");
        self.send(req).await
    }

    /// Follow an absolute URL minted by this app.
    pub async fn get_absolute(&self, url: &str) -> TestResponse {
        let path = url
            .strip_prefix(ORIGIN)
            .unwrap_or_else(|| panic!("URL {url} is not served by this app"));
        self.request("GET", path, None).await
    }

    /// Resolve a short link and return the redirect target.
    pub async fn redirect_target(&self, id: &str) -> String {
        let response = self.request("GET", &format!("/i/{id}"), None).await;
        assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
        response.header(header::LOCATION.as_str()).expect("No Location header")
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn push_text_field(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
            .as_bytes(),
    );
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON, `Null` if it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// A header value as a string.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }
}
