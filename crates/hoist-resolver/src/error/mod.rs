//! Domain errors raised while loading manifests and resolving dependencies.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! so outcomes carrying them stay cheap to clone.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising while locating or parsing the bootstrap manifest.
#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    /// No manifest exists at the expected location.
    #[error("bootstrap manifest not found at '{}'", path.display())]
    Missing {
        /// Location that was checked.
        path: PathBuf,
    },

    /// The manifest exists but could not be read.
    #[error("failed to read bootstrap manifest '{}': {source}", path.display())]
    Read {
        /// Location of the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The manifest content violates the expected format.
    #[error("malformed bootstrap manifest: {message}")]
    Malformed {
        /// Description of the violation.
        message: String,
    },
}

impl ManifestError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Errors arising from a single repository attempt for one dependency.
///
/// None of these abort resolution: the fetcher records them and moves on to
/// the next repository.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The repository answered with something other than `200 OK`.
    #[error("{url} answered with HTTP status {status}")]
    Status {
        /// Candidate URL that was requested.
        url: String,
        /// Status code returned by the repository.
        status: u16,
    },

    /// The request could not be completed (DNS, connect, timeout, TLS, ...).
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Candidate URL that was requested.
        url: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The cache directory could not be prepared.
    #[error("failed to prepare cache directory '{}': {source}", path.display())]
    CacheDirectory {
        /// Cache directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Streaming the response body into the cache failed.
    #[error("failed to store {url} as '{}': {source}", path.display())]
    Write {
        /// Candidate URL that was requested.
        url: String,
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl FetchError {
    /// Returns the candidate URL involved, when the failure concerns one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } | Self::Write { url, .. } => {
                Some(url.as_str())
            }
            Self::CacheDirectory { .. } => None,
        }
    }
}

/// Errors raised by a confirmation gate.
#[derive(Debug, Clone, Error)]
pub enum ConfirmError {
    /// Input ended before the operator gave a recognised answer.
    #[error("confirmation input closed before an answer was given")]
    InputClosed,

    /// Reading the answer or writing the prompt failed.
    #[error("confirmation prompt failed: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl From<std::io::Error> for ConfirmError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source: Arc::new(source),
        }
    }
}

/// Errors that stop a resolution run before any download starts.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The confirmation gate could not obtain an answer.
    #[error("could not obtain download confirmation: {0}")]
    Confirmation(#[from] ConfirmError),
}
