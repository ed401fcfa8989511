//! Structured reporting of bootstrap lifecycle events.

use std::sync::Arc;

use hoist_resolver::{BootstrapManifest, Dependency, ResolutionOutcome};

use crate::bootstrap::{BootstrapError, BootstrapPhase};

const HEALTH_TARGET: &str = "hoist::bootstrap";

/// Observer notified as the bootstrap state machine advances.
pub trait BootstrapReporter {
    /// Invoked on every state transition, including the first.
    fn phase_entered(&self, phase: BootstrapPhase);

    /// Invoked once the manifest has been parsed.
    fn manifest_loaded(&self, manifest: &BootstrapManifest);

    /// Invoked after the cache has been probed.
    fn dependencies_checked(&self, required: usize, missing: &[Dependency]);

    /// Invoked when resolution finishes without error.
    fn resolution_finished(&self, outcome: &ResolutionOutcome);

    /// Invoked when bootstrap stops with an error.
    fn bootstrap_failed(&self, error: &BootstrapError);
}

impl<T> BootstrapReporter for Arc<T>
where
    T: BootstrapReporter + ?Sized,
{
    fn phase_entered(&self, phase: BootstrapPhase) {
        (**self).phase_entered(phase);
    }

    fn manifest_loaded(&self, manifest: &BootstrapManifest) {
        (**self).manifest_loaded(manifest);
    }

    fn dependencies_checked(&self, required: usize, missing: &[Dependency]) {
        (**self).dependencies_checked(required, missing);
    }

    fn resolution_finished(&self, outcome: &ResolutionOutcome) {
        (**self).resolution_finished(outcome);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredReporter;

impl StructuredReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BootstrapReporter for StructuredReporter {
    fn phase_entered(&self, phase: BootstrapPhase) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "phase_entered",
            phase = %phase,
            "bootstrap phase entered"
        );
    }

    fn manifest_loaded(&self, manifest: &BootstrapManifest) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "manifest_loaded",
            entry_point = manifest.entry_point(),
            repositories = manifest.repositories().len(),
            dependencies = manifest.dependencies().len(),
            "bootstrap manifest loaded"
        );
    }

    fn dependencies_checked(&self, required: usize, missing: &[Dependency]) {
        let names: Vec<&str> = missing.iter().map(Dependency::basename).collect();
        tracing::info!(
            target: HEALTH_TARGET,
            event = "dependencies_checked",
            required,
            missing = missing.len(),
            names = %names.join(", "),
            "dependency cache checked"
        );
    }

    fn resolution_finished(&self, outcome: &ResolutionOutcome) {
        let unresolved: Vec<&str> = outcome
            .unresolved()
            .iter()
            .map(Dependency::basename)
            .collect();
        tracing::info!(
            target: HEALTH_TARGET,
            event = "resolution_finished",
            complete = outcome.is_complete(),
            unresolved = %unresolved.join(", "),
            "dependency resolution finished"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "bootstrap failed"
        );
    }
}
