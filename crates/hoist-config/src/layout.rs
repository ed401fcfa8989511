//! Derives the on-disk artifact layout consumed by the loader.
//!
//! The packaging step places the bootstrap manifest and the dependency cache
//! directory next to the loader executable. Both the resolver and the
//! launcher need to agree on these paths, so they are computed once here and
//! threaded through explicitly.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Config;

/// File name of the bootstrap manifest written by the packaging step.
pub const MANIFEST_FILE_NAME: &str = "boot-loader.properties";

/// Name of the dependency cache directory inside the artifact root.
pub const CACHE_DIR_NAME: &str = "lib";

/// Canonical paths for a packaged artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
    manifest_path: PathBuf,
    cache_dir: PathBuf,
}

impl ArtifactLayout {
    /// Derives the layout from configuration, falling back to the directory
    /// holding the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when no override is configured and the
    /// executable location cannot be determined.
    pub fn from_config(config: &Config) -> Result<Self, LayoutError> {
        match config.artifact_root() {
            Some(root) => Ok(Self::from_root(root.as_std_path())),
            None => executable_directory().map(Self::from_root),
        }
    }

    /// Builds the layout rooted at `root`.
    #[must_use]
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            manifest_path: root.join(MANIFEST_FILE_NAME),
            cache_dir: root.join(CACHE_DIR_NAME),
            root,
        }
    }

    /// Directory holding the artifact.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Path to the bootstrap manifest.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        self.manifest_path.as_path()
    }

    /// Path to the dependency cache directory. It may not exist yet.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        self.cache_dir.as_path()
    }
}

fn executable_directory() -> Result<PathBuf, LayoutError> {
    let executable =
        env::current_exe().map_err(|source| LayoutError::CurrentExecutable { source })?;
    match executable.parent() {
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(LayoutError::MissingParent { path: executable }),
    }
}

/// Errors raised while deriving the artifact layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The running executable could not be located.
    #[error("failed to locate the running executable: {source}")]
    CurrentExecutable {
        #[source]
        source: std::io::Error,
    },
    /// The executable path lacked a parent directory.
    #[error("executable path '{}' has no parent directory", path.display())]
    MissingParent { path: PathBuf },
}
