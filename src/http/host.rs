//! The host application contract.
//!
//! A host is anything that can attach a router at a path prefix and later
//! detach it again. Routers call [`HostApp::use_router`] once per install and
//! [`HostApp::unuse_router`] once per uninstall.

use std::fmt;

use async_trait::async_trait;
use axum::Router;
use thiserror::Error;

use crate::service::error::Cause;

/// Handle returned by a host for a mounted router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(u64);

impl MountId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mount-{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("invalid mount path '{0}'")]
    InvalidPath(String),
    #[error("mount path '{0}' is already in use")]
    PathInUse(String),
    #[error("mount path '{path}' overlaps mounted path '{existing}'")]
    PathOverlaps { path: String, existing: String },
    #[error("routes conflict: {0}")]
    RouteConflict(String),
    #[error("unknown mount {0}")]
    UnknownMount(MountId),
}

/// Attach/detach operations of a host application.
#[async_trait]
pub trait HostApp: Send + Sync {
    /// Mount `router` under `path` (`/` or `/a/b`).
    async fn use_router(&self, path: &str, router: Router) -> Result<MountId, Cause>;

    /// Detach a router previously mounted by [`HostApp::use_router`].
    async fn unuse_router(&self, mount: MountId) -> Result<(), Cause>;
}

/// Whether `segment` can appear as a literal path segment.
///
/// Rejects route-syntax characters so a mount path or action can never be
/// read as a capture.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '{' | '}' | ':' | '*' | '?' | '#'))
}

/// Whether `path` is a relative path of valid segments (`api`, `a/b`).
/// The empty path is valid and means "no prefix".
pub fn is_valid_relative_path(path: &str) -> bool {
    path.is_empty() || path.split('/').all(is_valid_segment)
}

/// Join relative path pieces into an absolute mount path.
///
/// Leading and trailing slashes on each piece are ignored; empty pieces are
/// skipped. Joining nothing yields `/`.
pub fn mount_path(pieces: &[&str]) -> String {
    let joined = pieces
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Whether two absolute mount paths can route the same request.
///
/// `/` overlaps everything; otherwise one path must be a segment prefix of
/// the other (`/a` and `/a/b`, but not `/a` and `/ab`).
pub fn mount_paths_overlap(a: &str, b: &str) -> bool {
    fn within(inner: &str, outer: &str) -> bool {
        inner.strip_prefix(outer).is_some_and(|rest| rest.starts_with('/'))
    }
    a == b || a == "/" || b == "/" || within(a, b) || within(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_path() {
        assert_eq!(mount_path(&["webservice", "api"]), "/webservice/api");
        assert_eq!(mount_path(&["/webservice/", "/api"]), "/webservice/api");
        assert_eq!(mount_path(&["", "api"]), "/api");
        assert_eq!(mount_path(&["", ""]), "/");
        assert_eq!(mount_path(&[]), "/");
    }

    #[test]
    fn test_segments() {
        assert!(is_valid_segment("hello"));
        assert!(is_valid_segment("hello-world_2"));
        assert!(!is_valid_segment(""));
        assert!(!is_valid_segment("{id}"));
        assert!(!is_valid_segment(":id"));
        assert!(!is_valid_segment("a b"));

        assert!(is_valid_relative_path(""));
        assert!(is_valid_relative_path("v1/api"));
        assert!(!is_valid_relative_path("/api"));
        assert!(!is_valid_relative_path("a//b"));
    }

    #[test]
    fn test_mount_paths_overlap() {
        assert!(mount_paths_overlap("/webservice/api", "/webservice/api"));
        assert!(mount_paths_overlap("/webservice/api", "/webservice"));
        assert!(mount_paths_overlap("/webservice", "/webservice/api"));
        assert!(mount_paths_overlap("/", "/other"));
        assert!(mount_paths_overlap("/other", "/"));

        assert!(!mount_paths_overlap("/webservice", "/webservices"));
        assert!(!mount_paths_overlap("/webservice/api", "/webservice/admin"));
        assert!(!mount_paths_overlap("/a", "/b"));
    }

    #[test]
    fn test_mount_id_display() {
        assert_eq!(MountId::new(3).to_string(), "mount-3");
        assert_eq!(MountId::new(3).get(), 3);
    }
}
