//! Dependency resolution core for the `hoist` bootstrap loader.
//!
//! An application artifact ships with a bootstrap manifest naming its entry
//! point, an ordered list of repositories, and the relative paths of the
//! third-party artifacts it needs. This crate answers two questions about
//! that manifest:
//!
//! 1. Which dependencies are missing from the artifact's local cache
//!    directory? See [`find_missing`].
//! 2. Can the missing ones be downloaded? See [`Resolver::resolve_all`],
//!    which asks a [`ConfirmationGate`] once and then drives a
//!    [`RepositoryFetcher`] over every missing dependency in manifest order.
//!
//! Everything is synchronous and single-threaded. The only shared mutable
//! resource is the cache directory; concurrent loader processes writing to
//! the same directory are not coordinated and race with undefined outcome.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use hoist_resolver::{
//!     BootstrapManifest, CacheDir, HttpTransport, PolicyGate, Resolver, TransportSettings,
//!     find_missing,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = BootstrapManifest::load(Path::new("/opt/app/boot-loader.properties"))?;
//! let cache = CacheDir::new("/opt/app/lib");
//! let missing = find_missing(manifest.dependencies(), &cache);
//!
//! let resolver = Resolver::new(HttpTransport::new(&TransportSettings::default()));
//! let mut gate = PolicyGate::assume_yes();
//! let outcome = resolver.resolve_all(&missing, manifest.repositories(), &cache, &mut gate)?;
//! assert!(outcome.unresolved().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod confirm;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod probe;
pub mod resolve;

#[cfg(test)]
mod tests;

pub use self::confirm::{ConfirmationGate, PolicyGate, TerminalGate};
pub use self::error::{ConfirmError, FetchError, ManifestError, ResolveError};
pub use self::fetch::http::{HttpTransport, TransportSettings};
pub use self::fetch::{ArtifactTransport, FetchOutcome, RepositoryFetcher};
pub use self::manifest::{BootstrapManifest, Dependency, Repository};
pub use self::probe::{CacheDir, DependencySet, find_missing};
pub use self::resolve::{ResolutionOutcome, Resolver};
