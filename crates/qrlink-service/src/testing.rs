//! Shared fixtures for service tests: a temp-dir local store and an
//! in-memory record store, each wrapped so individual calls can be made
//! to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use qrlink_core::config::LocalStorageConfig;
use qrlink_core::error::AppError;
use qrlink_core::result::AppResult;
use qrlink_core::traits::{ManualClock, ObjectStore, RecordStore, SignedUrl};
use qrlink_core::types::{ImageId, OwnerId};
use qrlink_database::MemoryImageRepository;
use qrlink_entity::image::ImageRecord;
use qrlink_storage::LocalStorageProvider;

use crate::context::RequestContext;
use crate::link::{LinkRegistry, ResolutionService};
use crate::upload::{UploadOrchestrator, UploadPolicy, UploadRequest};

pub(crate) const BASE_URL: &str = "http://localhost:8080";

#[derive(Debug)]
pub(crate) struct FaultyObjectStore {
    inner: Arc<LocalStorageProvider>,
    fail_put: AtomicBool,
    fail_remove: AtomicBool,
    fail_sign: AtomicBool,
    stall_put: AtomicBool,
    put_calls: AtomicUsize,
    last_put: Mutex<Option<String>>,
}

impl FaultyObjectStore {
    pub(crate) fn fail_put(&self, on: bool) {
        self.fail_put.store(on, Ordering::SeqCst);
    }

    pub(crate) fn fail_remove(&self, on: bool) {
        self.fail_remove.store(on, Ordering::SeqCst);
    }

    pub(crate) fn fail_sign(&self, on: bool) {
        self.fail_sign.store(on, Ordering::SeqCst);
    }

    /// Land the write, then hang without acknowledging it.
    pub(crate) fn stall_put(&self, on: bool) {
        self.stall_put.store(on, Ordering::SeqCst);
    }

    pub(crate) fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_put(&self) -> Option<String> {
        self.last_put.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FaultyObjectStore {
    fn provider_type(&self) -> &str {
        "faulty-local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected put failure"));
        }
        self.inner.put(path, data).await?;
        *self.last_put.lock().unwrap() = Some(path.to_string());
        if self.stall_put.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected remove failure"));
        }
        self.inner.remove(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }

    async fn sign_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl> {
        if self.fail_sign.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected sign failure"));
        }
        self.inner.sign_url(path, ttl).await
    }
}

#[derive(Debug, Default)]
pub(crate) struct FaultyRecordStore {
    inner: MemoryImageRepository,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
    fail_select: AtomicBool,
    collide_next: AtomicBool,
    insert_calls: AtomicUsize,
}

impl FaultyRecordStore {
    pub(crate) fn fail_insert(&self, on: bool) {
        self.fail_insert.store(on, Ordering::SeqCst);
    }

    pub(crate) fn fail_delete(&self, on: bool) {
        self.fail_delete.store(on, Ordering::SeqCst);
    }

    pub(crate) fn fail_select(&self, on: bool) {
        self.fail_select.store(on, Ordering::SeqCst);
    }

    pub(crate) fn collide_next_insert(&self) {
        self.collide_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore<ImageRecord> for FaultyRecordStore {
    async fn insert(&self, owner_id: &OwnerId, storage_path: &str) -> AppResult<ImageRecord> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.collide_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::duplicate("injected id collision"));
        }
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected insert failure"));
        }
        self.inner.insert(owner_id, storage_path).await
    }

    async fn select_by_owner(&self, owner_id: &OwnerId) -> AppResult<Vec<ImageRecord>> {
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected select failure"));
        }
        self.inner.select_by_owner(owner_id).await
    }

    async fn select_by_id(&self, id: &ImageId) -> AppResult<Option<ImageRecord>> {
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected select failure"));
        }
        self.inner.select_by_id(id).await
    }

    async fn delete_by_id(&self, id: &ImageId) -> AppResult<bool> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected delete failure"));
        }
        self.inner.delete_by_id(id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

pub(crate) struct Harness {
    _dir: tempfile::TempDir,
    pub(crate) clock: Arc<ManualClock>,
    pub(crate) local: Arc<LocalStorageProvider>,
    pub(crate) objects: Arc<FaultyObjectStore>,
    pub(crate) records: Arc<FaultyRecordStore>,
    pub(crate) registry: Arc<LinkRegistry>,
    pub(crate) resolver: ResolutionService,
    pub(crate) uploader: UploadOrchestrator,
}

impl Harness {
    /// Dereference a URL minted by the local provider.
    pub(crate) async fn fetch(&self, url: &str) -> AppResult<Bytes> {
        let rest = url
            .strip_prefix(&format!("{BASE_URL}/blobs/"))
            .ok_or_else(|| AppError::internal(format!("unexpected url {url}")))?;
        let (path, query) = rest
            .split_once('?')
            .ok_or_else(|| AppError::internal("missing query"))?;
        let mut expires = 0;
        let mut signature = "";
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", v)) => expires = v.parse().unwrap_or_default(),
                Some(("signature", v)) => signature = v,
                _ => {}
            }
        }
        self.local.open_signed(path, expires, signature).await
    }
}

pub(crate) async fn harness() -> Harness {
    harness_with_timeout(Duration::from_secs(5)).await
}

/// A harness whose store calls give up after `timeout`.
pub(crate) async fn harness_with_timeout(timeout: Duration) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let config = LocalStorageConfig {
        root_path: dir.path().to_string_lossy().into_owned(),
        signing_secret: "service-test-secret".to_string(),
        public_base_url: BASE_URL.to_string(),
    };
    let local = Arc::new(
        LocalStorageProvider::new(&config, clock.clone())
            .await
            .unwrap(),
    );
    let objects = Arc::new(FaultyObjectStore {
        inner: local.clone(),
        fail_put: AtomicBool::new(false),
        fail_remove: AtomicBool::new(false),
        fail_sign: AtomicBool::new(false),
        stall_put: AtomicBool::new(false),
        put_calls: AtomicUsize::new(0),
        last_put: Mutex::new(None),
    });
    let records = Arc::new(FaultyRecordStore::default());
    let registry = Arc::new(LinkRegistry::new(
        records.clone(),
        objects.clone(),
        timeout,
    ));
    let resolver = ResolutionService::new(registry.clone(), Duration::from_secs(600));
    let uploader = UploadOrchestrator::new(
        registry.clone(),
        UploadPolicy::from_config(&qrlink_core::config::LinkConfig::default()),
        clock.clone(),
    );

    Harness {
        _dir: dir,
        clock,
        local,
        objects,
        records,
        registry,
        resolver,
        uploader,
    }
}

pub(crate) fn ctx(owner: &str) -> RequestContext {
    RequestContext::new(OwnerId::parse(owner).unwrap())
}

pub(crate) fn jpeg(len: usize) -> UploadRequest {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(len.max(4), 0x11);
    UploadRequest::new(Bytes::from(data), "image/jpeg", Some("photo.jpg".to_string()))
}
