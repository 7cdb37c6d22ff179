//! Shared helpers for the HTTP-level tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header::CONTENT_TYPE};
use clubhouse_api::{AppState, AppStateInner};
use clubhouse_db::Database;
use clubhouse_upstream::{
    AllowList, AllowListEntry, ImageUpload, ObjectStore, StoredObject, UpstreamError,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const BOUNDARY: &str = "clubhouse-test-boundary";

/// Allow-list answering from a fixed map of active entries.
#[derive(Default)]
pub struct FakeAllowList {
    entries: HashMap<String, AllowListEntry>,
    fail_with: Option<u16>,
}

impl FakeAllowList {
    pub fn with(mut self, email: &str, id: i64, is_admin: bool) -> Self {
        self.entries.insert(email.to_string(), AllowListEntry { id, is_admin });
        self
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AllowList for FakeAllowList {
    async fn lookup(&self, email: &str) -> Result<Option<AllowListEntry>, UpstreamError> {
        if let Some(status) = self.fail_with {
            return Err(UpstreamError::QueryFailed { status });
        }
        Ok(self.entries.get(email).copied())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub len: usize,
}

/// Object store that remembers every upload, or rejects all of them.
#[derive(Default)]
pub struct FakeStore {
    uploads: Mutex<Vec<RecordedUpload>>,
    reject_with: Option<(u16, &'static str)>,
}

impl FakeStore {
    pub fn rejecting(status: u16, body: &'static str) -> Self {
        Self {
            reject_with: Some((status, body)),
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_image(&self, upload: &ImageUpload) -> Result<StoredObject, UpstreamError> {
        if let Some((status, body)) = self.reject_with {
            return Err(UpstreamError::UploadFailed {
                status,
                body: body.to_string(),
            });
        }

        let bucket = format!("{}-bucket", upload.category());
        self.uploads.lock().unwrap().push(RecordedUpload {
            bucket: bucket.clone(),
            key: upload.key().to_string(),
            content_type: upload.content_type().to_string(),
            len: upload.len(),
        });
        Ok(StoredObject {
            key: upload.key().to_string(),
            public_url: format!("https://files.test/{}/{}", bucket, upload.key()),
            bucket,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<FakeStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(FakeAllowList::default(), FakeStore::default(), 5 * 1024 * 1024)
    }

    pub fn with_allow_list(allow_list: FakeAllowList) -> Self {
        Self::build(allow_list, FakeStore::default(), 5 * 1024 * 1024)
    }

    pub fn build(allow_list: FakeAllowList, store: FakeStore, max_upload_bytes: usize) -> Self {
        let store = Arc::new(store);
        let state = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            allow_list: Arc::new(allow_list),
            storage: store.clone(),
            max_upload_bytes,
        });
        Self {
            router: clubhouse_api::router(state.clone()),
            state,
            store,
        }
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(Request::get(path).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(Request::delete(path).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: Method, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, path, body).await
    }

    pub async fn post_multipart(&self, path: &str, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = Request::post(path)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
