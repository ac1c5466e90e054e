//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use web_service_host::greeting;
use web_service_host::http::{AxumHost, HostApp, MountId};
use web_service_host::{Cause, WebService};

pub const USER_NAME: &str = "Jaymoney";

/// Greeting state seeded with [`USER_NAME`].
pub fn seeded_state() -> Map<String, Value> {
    greeting::initial_state(USER_NAME)
}

/// An uninstalled greeting service on port 3000.
pub fn greeting_service(host: Arc<dyn HostApp>) -> WebService {
    greeting::greeting_service(host, greeting::default_props(3000, seeded_state()))
}

/// Host wrapper that counts mount calls and can be told to fail unmounting.
pub struct RecordingHost {
    inner: Arc<AxumHost>,
    fail_unuse: bool,
    pub use_calls: AtomicUsize,
    pub unuse_calls: AtomicUsize,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Self::build(false)
    }

    /// A host whose `unuse_router` always fails with `"forced exception"`.
    pub fn failing_unuse() -> Arc<Self> {
        Self::build(true)
    }

    fn build(fail_unuse: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: AxumHost::new(),
            fail_unuse,
            use_calls: AtomicUsize::new(0),
            unuse_calls: AtomicUsize::new(0),
        })
    }

    pub fn uses(&self) -> usize {
        self.use_calls.load(Ordering::SeqCst)
    }

    pub fn unuses(&self) -> usize {
        self.unuse_calls.load(Ordering::SeqCst)
    }

    pub fn app(&self) -> Router {
        self.inner.router()
    }
}

#[async_trait]
impl HostApp for RecordingHost {
    async fn use_router(&self, path: &str, router: Router) -> Result<MountId, Cause> {
        self.use_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.use_router(path, router).await
    }

    async fn unuse_router(&self, mount: MountId) -> Result<(), Cause> {
        self.unuse_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unuse {
            return Err(Cause::from("forced exception"));
        }
        self.inner.unuse_router(mount).await
    }
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(null))
}
