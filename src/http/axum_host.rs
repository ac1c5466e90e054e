//! A live axum application with runtime mounts.
//!
//! # Responsibilities
//! - Keep the table of mounted routers in mount order
//! - Recompose the served router whenever a mount is added or removed
//! - Dispatch each request to the router that was live when it arrived
//!
//! # Design Decisions
//! - Mount table changes are serialised behind an async mutex
//! - The composed router is published through `ArcSwap`, so dispatch never locks
//! - Mount paths may not overlap (`/a` with `/a/b`, or anything with `/`);
//!   a table is only published once it composes without a route conflict

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::{extract::Request, Router};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::http::host::{mount_paths_overlap, HostApp, HostError, MountId};
use crate::service::error::Cause;

#[derive(Clone)]
struct Mount {
    path: String,
    router: Router,
}

/// Host application backed by axum.
pub struct AxumHost {
    mounts: Mutex<BTreeMap<MountId, Mount>>,
    live: ArcSwap<Router>,
    next_id: AtomicU64,
}

impl AxumHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            mounts: Mutex::new(BTreeMap::new()),
            live: ArcSwap::from_pointee(Router::new()),
            next_id: AtomicU64::new(1),
        })
    }

    /// The router to serve. It always dispatches to the current mounts.
    pub fn router(self: &Arc<Self>) -> Router {
        let host = Arc::clone(self);
        Router::new().fallback(move |request: Request| {
            let live = host.live.load_full();
            async move {
                match Router::clone(&live).oneshot(request).await {
                    Ok(response) => response,
                    Err(never) => match never {},
                }
            }
        })
    }

    /// Mounted paths, in mount order.
    pub async fn mounted_paths(&self) -> Vec<String> {
        self.mounts.lock().await.values().map(|m| m.path.clone()).collect()
    }

    fn compose(mounts: &BTreeMap<MountId, Mount>) -> Router {
        mounts.values().fold(Router::new(), |app, mount| {
            if mount.path == "/" {
                app.merge(mount.router.clone())
            } else {
                app.nest(&mount.path, mount.router.clone())
            }
        })
    }

    /// Compose `mounts`, turning axum's route-conflict panic into an error.
    fn try_compose(mounts: &BTreeMap<MountId, Mount>) -> Result<Router, HostError> {
        panic::catch_unwind(AssertUnwindSafe(|| Self::compose(mounts))).map_err(|payload| {
            let message = payload
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| payload.downcast_ref::<&str>().copied())
                .unwrap_or("router composition failed");
            HostError::RouteConflict(message.to_string())
        })
    }
}

fn is_absolute_mount_path(path: &str) -> bool {
    path == "/"
        || (path.starts_with('/')
            && !path.ends_with('/')
            && crate::http::host::is_valid_relative_path(&path[1..]))
}

#[async_trait]
impl HostApp for AxumHost {
    async fn use_router(&self, path: &str, router: Router) -> Result<MountId, Cause> {
        if !is_absolute_mount_path(path) {
            return Err(HostError::InvalidPath(path.to_string()).into());
        }

        let mut mounts = self.mounts.lock().await;
        if let Some(existing) = mounts.values().find(|m| mount_paths_overlap(&m.path, path)) {
            let err = if existing.path == path {
                HostError::PathInUse(path.to_string())
            } else {
                HostError::PathOverlaps {
                    path: path.to_string(),
                    existing: existing.path.clone(),
                }
            };
            return Err(err.into());
        }

        // The live table only changes once the candidate composes.
        let id = MountId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut candidate = mounts.clone();
        candidate.insert(
            id,
            Mount {
                path: path.to_string(),
                router,
            },
        );
        let composed = Self::try_compose(&candidate)?;
        *mounts = candidate;
        self.live.store(Arc::new(composed));

        tracing::debug!(mount = %id, path = %path, mounts = mounts.len(), "Router mounted");
        Ok(id)
    }

    async fn unuse_router(&self, mount: MountId) -> Result<(), Cause> {
        let mut mounts = self.mounts.lock().await;
        let mut candidate = mounts.clone();
        let removed = candidate.remove(&mount).ok_or(HostError::UnknownMount(mount))?;
        let composed = Self::try_compose(&candidate)?;
        *mounts = candidate;
        self.live.store(Arc::new(composed));

        tracing::debug!(mount = %mount, path = %removed.path, mounts = mounts.len(), "Router unmounted");
        Ok(())
    }
}
