//! Local cache probing.
//!
//! The cache directory is a flat folder of artifacts named by basename.
//! Presence is decided by file name alone: whatever sits in the directory
//! under a dependency's basename counts as that dependency.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::manifest::Dependency;

const PROBE_TARGET: &str = "hoist_resolver::probe";

/// Handle on the artifact cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    path: PathBuf,
}

impl CacheDir {
    /// Wraps the cache directory path. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Reports whether the path exists and is a directory.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.path.is_dir()
    }

    /// Returns where `dependency` lives inside the cache.
    #[must_use]
    pub fn entry_path(&self, dependency: &Dependency) -> PathBuf {
        self.path.join(dependency.basename())
    }

    /// Creates the directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when creation fails.
    pub fn ensure_exists(&self) -> io::Result<()> {
        fs::create_dir_all(&self.path)
    }
}

/// Snapshot of the file names present in the cache directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    names: HashSet<String>,
}

impl DependencySet {
    /// Lists the cache directory once.
    ///
    /// An absent directory yields an empty set. A directory that cannot be
    /// listed is logged and treated as empty.
    #[must_use]
    pub fn scan(cache: &CacheDir) -> Self {
        if !cache.is_present() {
            return Self::default();
        }
        match read_names(cache.path()) {
            Ok(names) => Self { names },
            Err(error) => {
                warn!(
                    target: PROBE_TARGET,
                    path = %cache.path().display(),
                    %error,
                    "cache directory could not be listed; treating it as empty"
                );
                Self::default()
            }
        }
    }

    /// Reports whether a file with `basename` was present.
    #[must_use]
    pub fn contains(&self, basename: &str) -> bool {
        self.names.contains(basename)
    }

    /// Returns the number of entries seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Reports whether the directory held no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn read_names(path: &Path) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for item in fs::read_dir(path)? {
        let entry = item?;
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_owned());
        }
    }
    Ok(names)
}

/// Returns the dependencies whose basename is absent from `cache`, in input
/// order.
///
/// When the cache directory does not exist (first run) every dependency is
/// missing. The directory is listed afresh on each call.
#[must_use]
pub fn find_missing(dependencies: &[Dependency], cache: &CacheDir) -> Vec<Dependency> {
    if dependencies.is_empty() {
        return Vec::new();
    }
    if !cache.is_present() {
        debug!(
            target: PROBE_TARGET,
            path = %cache.path().display(),
            "cache directory absent; every dependency is missing"
        );
        return dependencies.to_vec();
    }
    let present = DependencySet::scan(cache);
    let missing: Vec<Dependency> = dependencies
        .iter()
        .filter(|dependency| !present.contains(dependency.basename()))
        .cloned()
        .collect();
    debug!(
        target: PROBE_TARGET,
        required = dependencies.len(),
        missing = missing.len(),
        "probed cache directory"
    );
    missing
}
