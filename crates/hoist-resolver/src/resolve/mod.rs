//! Resolution of every missing dependency after a single confirmation.

use std::collections::HashSet;

use tracing::info;

use crate::confirm::ConfirmationGate;
use crate::error::ResolveError;
use crate::fetch::{ArtifactTransport, FetchOutcome, RepositoryFetcher};
use crate::manifest::{Dependency, Repository};
use crate::probe::CacheDir;

const RESOLVE_TARGET: &str = "hoist_resolver::resolve";

/// Aggregate result of a resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Every missing dependency is now in the cache.
    Complete {
        /// Dependencies downloaded during this run.
        fetched: Vec<Dependency>,
    },
    /// Some dependencies could not be downloaded from any repository.
    Partial {
        /// Dependencies downloaded during this run.
        fetched: Vec<Dependency>,
        /// Dependencies still missing, in manifest order.
        unresolved: Vec<Dependency>,
    },
    /// The operator declined; nothing was requested or written.
    Declined {
        /// Dependencies that remain missing.
        missing: Vec<Dependency>,
    },
}

impl ResolutionOutcome {
    /// Returns the dependencies still absent from the cache.
    #[must_use]
    pub const fn unresolved(&self) -> &[Dependency] {
        match self {
            Self::Complete { .. } => &[],
            Self::Partial { unresolved, .. } => unresolved.as_slice(),
            Self::Declined { missing } => missing.as_slice(),
        }
    }

    /// Reports whether nothing remains missing.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Drives confirmation and fetching for a set of missing dependencies.
#[derive(Debug, Clone)]
pub struct Resolver<T> {
    fetcher: RepositoryFetcher<T>,
}

impl<T: ArtifactTransport> Resolver<T> {
    /// Creates a resolver fetching through `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            fetcher: RepositoryFetcher::new(transport),
        }
    }

    /// Asks `gate` once, then fetches each of `missing` in order.
    ///
    /// With nothing missing the gate is not consulted. When the operator
    /// declines, no request is sent and the cache directory is not touched.
    /// Otherwise every dependency is attempted even after earlier failures.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Confirmation`] when the gate cannot produce
    /// an answer. No network activity happens in that case.
    pub fn resolve_all(
        &self,
        missing: &[Dependency],
        repositories: &[Repository],
        cache: &CacheDir,
        gate: &mut dyn ConfirmationGate,
    ) -> Result<ResolutionOutcome, ResolveError> {
        if missing.is_empty() {
            info!(target: RESOLVE_TARGET, "all dependencies are present");
            return Ok(ResolutionOutcome::Complete {
                fetched: Vec::new(),
            });
        }

        let names = missing
            .iter()
            .map(Dependency::basename)
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            target: RESOLVE_TARGET,
            count = missing.len(),
            dependencies = %names,
            "dependencies missing from cache"
        );

        if !gate.confirm(&download_prompt(missing.len(), &names))? {
            info!(target: RESOLVE_TARGET, "download declined");
            return Ok(ResolutionOutcome::Declined {
                missing: missing.to_vec(),
            });
        }

        let mut fetched = Vec::new();
        let mut unresolved = Vec::new();
        let mut stored: HashSet<&str> = HashSet::new();
        for dependency in missing {
            if stored.contains(dependency.basename()) {
                fetched.push(dependency.clone());
                continue;
            }
            match self.fetcher.fetch(dependency, repositories, cache) {
                FetchOutcome::Resolved { .. } => {
                    stored.insert(dependency.basename());
                    fetched.push(dependency.clone());
                }
                FetchOutcome::Unresolved { attempts } => {
                    info!(
                        target: RESOLVE_TARGET,
                        dependency = dependency.basename(),
                        attempts = attempts.len(),
                        "dependency could not be resolved"
                    );
                    unresolved.push(dependency.clone());
                }
            }
        }

        if unresolved.is_empty() {
            Ok(ResolutionOutcome::Complete { fetched })
        } else {
            Ok(ResolutionOutcome::Partial {
                fetched,
                unresolved,
            })
        }
    }
}

fn download_prompt(count: usize, names: &str) -> String {
    let noun = if count == 1 {
        "dependency"
    } else {
        "dependencies"
    };
    format!("Download {count} missing {noun} ({names})?")
}
