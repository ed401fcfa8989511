//! Shared doubles for unit and behaviour tests.

mod fake_repository;
mod memory;

pub(crate) use fake_repository::{FakeRepository, Route};
pub(crate) use memory::{MemoryTransport, ScriptedGate};

use crate::manifest::{Dependency, Repository};

pub(crate) fn dependency(path: &str) -> Dependency {
    Dependency::parse(path).expect("valid dependency path")
}

pub(crate) fn repository(url: &str) -> Repository {
    Repository::parse(url).expect("valid repository url")
}
