//! Bootstrap manifest model.
//!
//! A [`BootstrapManifest`] is written once by the packaging step next to the
//! artifact and read exactly once per launch. It names the entry point to
//! launch, the repositories to download from (in priority order), and the
//! relative paths of every dependency the application needs.
//!
//! The on-disk form is a small properties file:
//!
//! ```text
//! main-class=exec:bin/server
//! repository-paths=https://repo.maven.apache.org/maven2,https://mirror.example/maven
//! dependency-paths=org/slf4j/slf4j-api/2.0.9/slf4j-api-2.0.9.jar
//! ```

mod properties;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::error::ManifestError;

/// Key naming the application entry point.
pub const ENTRY_POINT_KEY: &str = "main-class";
/// Key listing repository base URLs, comma separated.
pub const REPOSITORIES_KEY: &str = "repository-paths";
/// Key listing dependency paths, comma separated.
pub const DEPENDENCIES_KEY: &str = "dependency-paths";

const MANIFEST_TARGET: &str = "hoist_resolver::manifest";

/// A relative artifact path such as `g/a/1.0/a-1.0.jar`.
///
/// Presence in the cache is decided by [`Dependency::basename`] alone, so
/// two paths ending in the same file name are the same artifact on disk.
///
/// # Example
///
/// ```
/// use hoist_resolver::Dependency;
///
/// let dep = Dependency::parse("org/slf4j/slf4j-api/2.0.9/slf4j-api-2.0.9.jar")?;
/// assert_eq!(dep.basename(), "slf4j-api-2.0.9.jar");
/// # Ok::<(), hoist_resolver::ManifestError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    path: String,
}

impl Dependency {
    /// Validates and wraps a relative dependency path.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] when the path is empty, absolute,
    /// contains `.`/`..` segments, or does not end in a file name.
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        let path = raw.trim();
        if path.is_empty() {
            return Err(ManifestError::malformed("dependency path must not be empty"));
        }
        if path.starts_with('/') {
            return Err(ManifestError::malformed(format!(
                "dependency path '{path}' must be relative"
            )));
        }
        if path.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(ManifestError::malformed(format!(
                "dependency path '{path}' must not contain '.' or '..' segments"
            )));
        }
        if path.ends_with('/') {
            return Err(ManifestError::malformed(format!(
                "dependency path '{path}' does not name a file"
            )));
        }
        Ok(Self {
            path: path.to_owned(),
        })
    }

    /// Returns the full relative path.
    #[must_use]
    pub const fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the file name after the last `/`.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map_or(self.path.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A remote repository base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    base: Url,
}

impl Repository {
    /// Parses an `http` or `https` base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] when the text is not a valid URL
    /// or uses another scheme.
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        let text = raw.trim();
        let base = Url::parse(text).map_err(|error| {
            ManifestError::malformed(format!("repository '{text}' is not a valid URL: {error}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ManifestError::malformed(format!(
                "repository '{text}' must use http or https"
            )));
        }
        Ok(Self { base })
    }

    /// Returns the base URL as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    /// Builds the download URL for `dependency` inside this repository.
    ///
    /// Exactly one `/` separates the base and the dependency path, however
    /// either side was written.
    ///
    /// # Example
    ///
    /// ```
    /// use hoist_resolver::{Dependency, Repository};
    ///
    /// let repo = Repository::parse("http://repo.example/")?;
    /// let dep = Dependency::parse("g/a/1.0/a-1.0.jar")?;
    /// assert_eq!(repo.candidate_url(&dep), "http://repo.example/g/a/1.0/a-1.0.jar");
    /// # Ok::<(), hoist_resolver::ManifestError>(())
    /// ```
    #[must_use]
    pub fn candidate_url(&self, dependency: &Dependency) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            dependency.path().trim_start_matches('/')
        )
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())
    }
}

/// Parsed bootstrap manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapManifest {
    entry_point: String,
    repositories: Vec<Repository>,
    dependencies: Vec<Dependency>,
}

impl BootstrapManifest {
    /// Creates a manifest from already validated parts.
    ///
    /// Exact duplicate dependencies are collapsed, keeping the first.
    #[must_use]
    pub fn new(
        entry_point: impl Into<String>,
        repositories: Vec<Repository>,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            entry_point: entry_point.into(),
            repositories,
            dependencies: dedupe(dependencies),
        }
    }

    /// Reads and parses the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Missing`] when no file exists at `path`,
    /// [`ManifestError::Read`] for other I/O failures, and
    /// [`ManifestError::Malformed`] when the content is invalid.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ManifestError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Read {
                    path: path.to_path_buf(),
                    source: Arc::new(source),
                }
            }
        })?;
        let manifest = Self::parse(&text)?;
        debug!(
            target: MANIFEST_TARGET,
            path = %path.display(),
            entry_point = manifest.entry_point(),
            repositories = manifest.repositories.len(),
            dependencies = manifest.dependencies.len(),
            "loaded bootstrap manifest"
        );
        Ok(manifest)
    }

    /// Parses manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] when the entry point is absent or
    /// blank, when dependencies are declared without any repository, or when
    /// any listed repository or dependency is invalid.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let entries = properties::parse(text)?;

        let entry_point = entries
            .get(ENTRY_POINT_KEY)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ManifestError::malformed(format!("required key '{ENTRY_POINT_KEY}' is missing"))
            })?;

        let repositories = split_list(entries.get(REPOSITORIES_KEY))
            .map(Repository::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let dependencies = split_list(entries.get(DEPENDENCIES_KEY))
            .map(Dependency::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if !dependencies.is_empty() && repositories.is_empty() {
            return Err(ManifestError::malformed(format!(
                "'{DEPENDENCIES_KEY}' is set but '{REPOSITORIES_KEY}' names no repository"
            )));
        }

        Ok(Self::new(entry_point, repositories, dependencies))
    }

    /// Renders the manifest in the form the packaging step writes.
    #[must_use]
    pub fn to_properties(&self) -> String {
        let mut entries = vec![(ENTRY_POINT_KEY, self.entry_point.clone())];
        if !self.repositories.is_empty() {
            entries.push((REPOSITORIES_KEY, join(&self.repositories)));
        }
        if !self.dependencies.is_empty() {
            entries.push((DEPENDENCIES_KEY, join(&self.dependencies)));
        }
        properties::render(entries)
    }

    /// Returns the entry point identifier.
    #[must_use]
    pub const fn entry_point(&self) -> &str {
        self.entry_point.as_str()
    }

    /// Returns repositories in priority order.
    #[must_use]
    pub const fn repositories(&self) -> &[Repository] {
        self.repositories.as_slice()
    }

    /// Returns dependencies in manifest order.
    #[must_use]
    pub const fn dependencies(&self) -> &[Dependency] {
        self.dependencies.as_slice()
    }
}

fn split_list(value: Option<&String>) -> impl Iterator<Item = &str> {
    value
        .into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn dedupe(dependencies: Vec<Dependency>) -> Vec<Dependency> {
    let mut seen = HashSet::new();
    dependencies
        .into_iter()
        .filter(|dependency| {
            let first = seen.insert(dependency.path.clone());
            if !first {
                debug!(
                    target: MANIFEST_TARGET,
                    dependency = dependency.path(),
                    "ignoring duplicate dependency entry"
                );
            }
            first
        })
        .collect()
}
