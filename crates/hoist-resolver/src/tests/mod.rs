//! Crate-level integration and BDD tests.

use std::fs;

use tempfile::TempDir;

use crate::manifest::BootstrapManifest;
use crate::probe::{CacheDir, find_missing};
use crate::resolve::Resolver;

pub(crate) mod support;

use support::{MemoryTransport, ScriptedGate};

#[test]
fn manifest_to_cache_end_to_end() {
    let root = TempDir::new().expect("temp dir");
    let manifest = BootstrapManifest::parse(concat!(
        "main-class=app\n",
        "repository-paths=http://repo.example/\n",
        "dependency-paths=g/a/1.0/a-1.0.jar\n",
    ))
    .expect("manifest");
    let cache = CacheDir::new(root.path().join("lib"));
    let transport =
        MemoryTransport::new().serve("http://repo.example/g/a/1.0/a-1.0.jar", b"artifact");

    let missing = find_missing(manifest.dependencies(), &cache);
    assert_eq!(missing.len(), 1);

    let outcome = Resolver::new(&transport)
        .resolve_all(
            &missing,
            manifest.repositories(),
            &cache,
            &mut ScriptedGate::answering(true),
        )
        .expect("resolve");

    assert!(outcome.is_complete());
    assert_eq!(
        fs::read(root.path().join("lib/a-1.0.jar")).expect("stored"),
        b"artifact"
    );
    assert!(find_missing(manifest.dependencies(), &cache).is_empty());
}
