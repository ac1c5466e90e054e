//! Per-package application data directories.
//!
//! # Resolution
//! ```text
//! absolute root  → <root>/appdata/<package>
//! relative root  → <exe dir>/<root>/appdata/<package>
//! no root        → <exe dir>/../appdata/<package>
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Resolve the data directory for `package_name` relative to `exe_dir`.
pub fn resolve_app_data_path(package_name: &str, app_data_root: Option<&Path>, exe_dir: &Path) -> PathBuf {
    match app_data_root {
        Some(root) if root.is_absolute() => root.join("appdata").join(package_name),
        Some(root) => exe_dir.join(root).join("appdata").join(package_name),
        None => exe_dir.join("..").join("appdata").join(package_name),
    }
}

/// Resolve the data directory for `package_name` relative to the running executable.
pub fn app_data_path(package_name: &str, app_data_root: Option<&Path>) -> io::Result<PathBuf> {
    // An absolute root never looks at the executable's location.
    let exe_dir = match app_data_root {
        Some(root) if root.is_absolute() => PathBuf::new(),
        _ => executable_dir()?,
    };
    let path = resolve_app_data_path(package_name, app_data_root, &exe_dir);
    tracing::debug!(
        package_name = %package_name,
        app_data_root = ?app_data_root,
        path = %path.display(),
        "Resolved app data path"
    );
    Ok(path)
}

/// Like [`app_data_path`], creating the directory if needed.
pub fn app_data_path_and_initialize(package_name: &str, app_data_root: Option<&Path>) -> io::Result<PathBuf> {
    let path = app_data_path(package_name, app_data_root)?;
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn executable_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKG: &str = "@my-namespace/web-router-web-service";

    #[test]
    fn test_absolute_root() {
        let path = resolve_app_data_path(PKG, Some(Path::new("/var/lib/host")), Path::new("/opt/bin"));
        assert_eq!(path, PathBuf::from("/var/lib/host/appdata/@my-namespace/web-router-web-service"));
    }

    #[test]
    fn test_relative_root() {
        let path = resolve_app_data_path(PKG, Some(Path::new("data")), Path::new("/opt/bin"));
        assert_eq!(path, PathBuf::from("/opt/bin/data/appdata/@my-namespace/web-router-web-service"));
    }

    #[test]
    fn test_no_root() {
        let path = resolve_app_data_path("pkg", None, Path::new("/opt/bin"));
        assert_eq!(path, PathBuf::from("/opt/bin/../appdata/pkg"));
    }

    #[test]
    fn test_initialize_creates_directory() {
        let root = std::env::temp_dir().join(format!("app-data-test-{}", uuid::Uuid::new_v4()));
        let path = app_data_path_and_initialize("pkg", Some(&root)).unwrap();
        assert!(path.is_dir());
        assert_eq!(path, root.join("appdata").join("pkg"));
        std::fs::remove_dir_all(&root).unwrap_or_default();
    }
}
