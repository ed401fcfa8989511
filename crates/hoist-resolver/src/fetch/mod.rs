//! Downloading one dependency from an ordered list of repositories.
//!
//! [`RepositoryFetcher`] walks the repositories in priority order and stops
//! at the first one that serves the artifact. Every failure along the way is
//! logged and recorded but never aborts the walk. The network side sits
//! behind [`ArtifactTransport`] so tests can substitute an in-memory double.

pub mod http;

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::manifest::{Dependency, Repository};
use crate::probe::CacheDir;

const FETCH_TARGET: &str = "hoist_resolver::fetch";

/// Opens candidate URLs and hands back the response body.
///
/// Implementations return `Ok` only for an HTTP `200` answer. Every other
/// status must surface as [`FetchError::Status`], and redirects are never
/// followed.
pub trait ArtifactTransport {
    /// Requests `url` and returns a reader over the response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for non-200 answers and
    /// [`FetchError::Transport`] when no answer was obtained.
    fn open(&self, url: &str) -> Result<Box<dyn Read + '_>, FetchError>;
}

impl<T: ArtifactTransport + ?Sized> ArtifactTransport for &T {
    fn open(&self, url: &str) -> Result<Box<dyn Read + '_>, FetchError> {
        (**self).open(url)
    }
}

/// Result of trying every repository for one dependency.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The artifact was stored in the cache.
    Resolved {
        /// Repository that served the artifact.
        repository: Repository,
        /// Final location inside the cache directory.
        path: PathBuf,
        /// Number of bytes written.
        bytes: u64,
    },
    /// No repository produced the artifact.
    Unresolved {
        /// One entry per failed repository, in the order tried.
        attempts: Vec<FetchError>,
    },
}

impl FetchOutcome {
    /// Reports whether the artifact ended up in the cache.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Fetches dependencies into a cache directory through a transport.
#[derive(Debug, Clone)]
pub struct RepositoryFetcher<T> {
    transport: T,
}

impl<T: ArtifactTransport> RepositoryFetcher<T> {
    /// Creates a fetcher over `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Tries each repository in order until one serves `dependency`.
    ///
    /// The cache directory is created only once a repository has answered
    /// with the artifact. The body is streamed into a temporary file inside
    /// the cache and renamed to the dependency's basename when complete, so
    /// a partial download never appears under the final name.
    pub fn fetch(
        &self,
        dependency: &Dependency,
        repositories: &[Repository],
        cache: &CacheDir,
    ) -> FetchOutcome {
        let mut attempts = Vec::new();
        for repository in repositories {
            let url = repository.candidate_url(dependency);
            debug!(target: FETCH_TARGET, %url, "requesting dependency");
            match self.try_repository(&url, dependency, cache) {
                Ok((path, bytes)) => {
                    info!(
                        target: FETCH_TARGET,
                        dependency = dependency.basename(),
                        repository = repository.as_str(),
                        bytes,
                        "downloaded dependency"
                    );
                    return FetchOutcome::Resolved {
                        repository: repository.clone(),
                        path,
                        bytes,
                    };
                }
                Err(error) => {
                    warn!(
                        target: FETCH_TARGET,
                        dependency = dependency.basename(),
                        repository = repository.as_str(),
                        %error,
                        "repository attempt failed"
                    );
                    attempts.push(error);
                }
            }
        }
        FetchOutcome::Unresolved { attempts }
    }

    fn try_repository(
        &self,
        url: &str,
        dependency: &Dependency,
        cache: &CacheDir,
    ) -> Result<(PathBuf, u64), FetchError> {
        let mut body = self.transport.open(url)?;
        cache
            .ensure_exists()
            .map_err(|source| FetchError::CacheDirectory {
                path: cache.path().to_path_buf(),
                source: Arc::new(source),
            })?;
        let destination = cache.entry_path(dependency);
        let write_error = |source: io::Error| FetchError::Write {
            url: url.to_owned(),
            path: destination.clone(),
            source: Arc::new(source),
        };
        let mut staging = NamedTempFile::new_in(cache.path()).map_err(write_error)?;
        let bytes = io::copy(&mut body, &mut staging).map_err(write_error)?;
        staging
            .persist(&destination)
            .map_err(|persist| write_error(persist.error))?;
        Ok((destination, bytes))
    }
}
