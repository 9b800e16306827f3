//! Artifact path management for xtask workflows.

use crate::runtime::error::{XtaskError, XtaskResult};
use std::fs;
use std::path::{Path, PathBuf};

const PACKAGE_DIR: &str = ".artifacts/package";
const SITE_DIR: &str = "crates/site";
const TRUNK_DIST_DIR: &str = "target/trunk-dist";
const PLUGIN_MANIFEST: &str = "public/config.json";

/// Central artifact path policy for xtask.
///
/// Keeps workspace-relative locations of the site crate, its release bundle and the packaged
/// archives in one place.
#[derive(Clone, Debug)]
pub struct ArtifactManager {
    root: PathBuf,
}

impl ArtifactManager {
    /// Create an artifact manager rooted at the workspace.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve a workspace-relative artifact path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Resolve a possibly-relative workspace path. Absolute paths are preserved.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Site crate directory; trunk runs from here.
    pub fn site_dir(&self) -> PathBuf {
        self.path(SITE_DIR)
    }

    /// Trunk dist directory, relative to [`site_dir`](Self::site_dir).
    pub fn trunk_dist_arg(&self) -> &'static str {
        TRUNK_DIST_DIR
    }

    /// Release bundle produced by `build-web`.
    pub fn bundle_dir(&self) -> PathBuf {
        self.site_dir().join(TRUNK_DIST_DIR)
    }

    /// Plugin manifest carrying the archive name and version.
    pub fn plugin_manifest(&self) -> PathBuf {
        self.site_dir().join(PLUGIN_MANIFEST)
    }

    /// Default output directory for packaged archives.
    pub fn package_dir(&self) -> PathBuf {
        self.path(PACKAGE_DIR)
    }

    /// Ensure a directory exists.
    pub fn ensure_dir(&self, path: &Path) -> XtaskResult<()> {
        fs::create_dir_all(path).map_err(|err| {
            XtaskError::io(format!("failed to create {}: {err}", path.display())).with_path(path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_root() -> PathBuf {
        std::env::temp_dir().join(format!(
            "xtask-artifacts-test-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time")
                .as_nanos()
        ))
    }

    #[test]
    fn artifact_paths_are_root_relative() {
        let root = PathBuf::from("/tmp/xtask-artifacts-root");
        let manager = ArtifactManager::new(root.clone());
        assert_eq!(manager.package_dir(), root.join(".artifacts/package"));
        assert_eq!(
            manager.bundle_dir(),
            root.join("crates/site/target/trunk-dist")
        );
        assert_eq!(
            manager.plugin_manifest(),
            root.join("crates/site/public/config.json")
        );
    }

    #[test]
    fn ensure_dir_creates_missing_directory() {
        let root = unique_temp_root();
        let manager = ArtifactManager::new(root.clone());
        let target = root.join("nested/output");
        manager.ensure_dir(&target).expect("ensure dir");
        assert!(target.is_dir());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn resolve_path_keeps_absolute_and_expands_relative() {
        let root = PathBuf::from("/tmp/xtask-artifacts-root");
        let manager = ArtifactManager::new(root.clone());
        assert_eq!(
            manager.resolve_path(Path::new("out")),
            root.join("out")
        );
        assert_eq!(
            manager.resolve_path(Path::new("/tmp/abs")),
            PathBuf::from("/tmp/abs")
        );
    }
}
