//! Bootstrap orchestration.
//!
//! One invocation walks a fixed sequence of phases:
//!
//! ```text
//! Start -> ManifestLoaded -> DependenciesChecked
//!   run:     -> Launching           -> Launched           -> End
//!   resolve: -> ResolutionRequested -> ResolutionReported -> End
//! ```
//!
//! Run mode only launches when the cache already holds every dependency.
//! Resolve mode asks for confirmation, downloads what is missing, and never
//! launches. Each terminal state writes a single `[hoist] ` status line.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use hoist_config::{ArtifactLayout, ConfirmPolicy};
use hoist_resolver::confirm::STATUS_PREFIX;
use hoist_resolver::{
    ArtifactTransport, BootstrapManifest, CacheDir, ConfirmationGate, Dependency, ManifestError,
    PolicyGate, ResolutionOutcome, ResolveError, Resolver, TerminalGate, find_missing,
};
use thiserror::Error;
use tracing::debug;

use crate::cli::Invocation;
use crate::health::BootstrapReporter;
use crate::launch::{Application, ApplicationRegistry, LaunchError};

const BOOTSTRAP_TARGET: &str = "hoist::bootstrap";

/// States of the bootstrap state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BootstrapPhase {
    /// Arguments classified; nothing read yet.
    Start,
    /// The manifest parsed successfully.
    ManifestLoaded,
    /// The cache has been probed.
    DependenciesChecked,
    /// Control is about to pass to the application.
    Launching,
    /// Missing dependencies are being resolved.
    ResolutionRequested,
    /// The application returned successfully.
    Launched,
    /// The resolution outcome has been reported.
    ResolutionReported,
    /// The invocation finished.
    End,
}

impl BootstrapPhase {
    /// Returns the snake-case name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ManifestLoaded => "manifest_loaded",
            Self::DependenciesChecked => "dependencies_checked",
            Self::Launching => "launching",
            Self::ResolutionRequested => "resolution_requested",
            Self::Launched => "launched",
            Self::ResolutionReported => "resolution_reported",
            Self::End => "end",
        }
    }
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end a bootstrap invocation.
#[derive(Debug, Clone, Error)]
pub enum BootstrapError {
    /// The manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// Resolution could not start.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The application could not be resolved or failed.
    #[error(transparent)]
    Launch(#[from] LaunchError),
    /// Writing an operator status line failed.
    #[error("failed to write status line: {0}")]
    Output(Arc<io::Error>),
}

impl From<io::Error> for BootstrapError {
    fn from(source: io::Error) -> Self {
        Self::Output(Arc::new(source))
    }
}

impl BootstrapError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Launch(error) => error.exit_code(),
            Self::Manifest(_) | Self::Resolve(_) | Self::Output(_) => 1,
        }
    }
}

/// Terminal result of a bootstrap invocation that did not fail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BootstrapOutcome {
    /// The application ran and returned successfully.
    Launched {
        /// Entry point that was launched.
        entry_point: String,
    },
    /// Run mode refused to launch because dependencies are missing.
    LaunchRefused {
        /// Dependencies absent from the cache.
        missing: Vec<Dependency>,
    },
    /// Resolve mode finished.
    Resolved(ResolutionOutcome),
}

impl BootstrapOutcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Launched { .. }
            | Self::Resolved(
                ResolutionOutcome::Complete { .. } | ResolutionOutcome::Declined { .. },
            ) => 0,
            Self::LaunchRefused { .. } | Self::Resolved(ResolutionOutcome::Partial { .. }) => 1,
        }
    }

    /// Operator-facing status line, without the prefix.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::Launched { entry_point } => format!("Launching {entry_point}"),
            Self::LaunchRefused { missing } => format!(
                "One or more dependencies are missing ({}). Terminating boot process.",
                basenames(missing)
            ),
            Self::Resolved(ResolutionOutcome::Complete { fetched }) if fetched.is_empty() => {
                String::from("All dependencies are already present.")
            }
            Self::Resolved(ResolutionOutcome::Complete { .. }) => String::from(
                "All dependencies downloaded. You may now run the application normally.",
            ),
            Self::Resolved(ResolutionOutcome::Partial { unresolved, .. }) => format!(
                "One or more dependencies could not be downloaded: {}",
                basenames(unresolved)
            ),
            Self::Resolved(ResolutionOutcome::Declined { missing }) => format!(
                "Download declined; {} missing {} left untouched.",
                missing.len(),
                if missing.len() == 1 {
                    "dependency"
                } else {
                    "dependencies"
                }
            ),
        }
    }
}

fn basenames(dependencies: &[Dependency]) -> String {
    dependencies
        .iter()
        .map(Dependency::basename)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_status(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{STATUS_PREFIX}{message}")?;
    out.flush()
}

fn gate_for<'g, R, W>(
    policy: ConfirmPolicy,
    input: R,
    out: &'g mut W,
) -> Box<dyn ConfirmationGate + 'g>
where
    R: BufRead + 'g,
    W: Write,
{
    match policy {
        ConfirmPolicy::Prompt => Box::new(TerminalGate::new(input, out)),
        ConfirmPolicy::AssumeYes => Box::new(PolicyGate::assume_yes()),
        ConfirmPolicy::AssumeNo => Box::new(PolicyGate::assume_no()),
    }
}

/// Drives one invocation through the bootstrap phases.
pub struct Bootstrapper<'a, T> {
    layout: &'a ArtifactLayout,
    registry: &'a ApplicationRegistry,
    reporter: &'a dyn BootstrapReporter,
    resolver: Resolver<T>,
}

impl<'a, T: ArtifactTransport> Bootstrapper<'a, T> {
    /// Wires the collaborators for one invocation.
    #[must_use]
    pub const fn new(
        layout: &'a ArtifactLayout,
        registry: &'a ApplicationRegistry,
        reporter: &'a dyn BootstrapReporter,
        transport: T,
    ) -> Self {
        Self {
            layout,
            registry,
            reporter,
            resolver: Resolver::new(transport),
        }
    }

    /// Executes `invocation`.
    ///
    /// `input` is read only when resolve mode prompts for confirmation.
    /// Status lines and the prompt go to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when the manifest cannot be loaded, the
    /// confirmation gate fails, or the application cannot be launched or
    /// fails. The reporter sees every failure.
    pub fn run<R, W>(
        &self,
        invocation: &Invocation,
        policy: ConfirmPolicy,
        input: R,
        out: &mut W,
    ) -> Result<BootstrapOutcome, BootstrapError>
    where
        R: BufRead,
        W: Write,
    {
        let result = self.advance(invocation, policy, input, out);
        match &result {
            Ok(_) => self.reporter.phase_entered(BootstrapPhase::End),
            Err(error) => self.reporter.bootstrap_failed(error),
        }
        result
    }

    fn advance<R, W>(
        &self,
        invocation: &Invocation,
        policy: ConfirmPolicy,
        input: R,
        out: &mut W,
    ) -> Result<BootstrapOutcome, BootstrapError>
    where
        R: BufRead,
        W: Write,
    {
        self.reporter.phase_entered(BootstrapPhase::Start);
        debug!(
            target: BOOTSTRAP_TARGET,
            mode = invocation.command_name().unwrap_or("run"),
            manifest = %self.layout.manifest_path().display(),
            "bootstrap invocation accepted"
        );

        let manifest = BootstrapManifest::load(self.layout.manifest_path())?;
        self.reporter.phase_entered(BootstrapPhase::ManifestLoaded);
        self.reporter.manifest_loaded(&manifest);

        let cache = CacheDir::new(self.layout.cache_dir());
        let missing = find_missing(manifest.dependencies(), &cache);
        self.reporter
            .phase_entered(BootstrapPhase::DependenciesChecked);
        self.reporter
            .dependencies_checked(manifest.dependencies().len(), &missing);

        match invocation {
            Invocation::Run { forwarded } => self.launch(&manifest, missing, forwarded, out),
            Invocation::Resolve => self.resolve(&manifest, &missing, &cache, policy, input, out),
        }
    }

    fn launch<W: Write>(
        &self,
        manifest: &BootstrapManifest,
        missing: Vec<Dependency>,
        forwarded: &[std::ffi::OsString],
        out: &mut W,
    ) -> Result<BootstrapOutcome, BootstrapError> {
        if !missing.is_empty() {
            let outcome = BootstrapOutcome::LaunchRefused { missing };
            write_status(out, &outcome.status_message())?;
            return Ok(outcome);
        }

        let entry = self.registry.resolve(
            manifest.entry_point(),
            self.layout.root(),
            self.layout.cache_dir(),
        )?;
        let outcome = BootstrapOutcome::Launched {
            entry_point: manifest.entry_point().to_owned(),
        };
        self.reporter.phase_entered(BootstrapPhase::Launching);
        write_status(out, &outcome.status_message())?;
        entry.launch(forwarded)?;
        self.reporter.phase_entered(BootstrapPhase::Launched);
        Ok(outcome)
    }

    fn resolve<R, W>(
        &self,
        manifest: &BootstrapManifest,
        missing: &[Dependency],
        cache: &CacheDir,
        policy: ConfirmPolicy,
        input: R,
        out: &mut W,
    ) -> Result<BootstrapOutcome, BootstrapError>
    where
        R: BufRead,
        W: Write,
    {
        self.reporter
            .phase_entered(BootstrapPhase::ResolutionRequested);
        let resolution = {
            let mut gate = gate_for(policy, input, &mut *out);
            self.resolver
                .resolve_all(missing, manifest.repositories(), cache, gate.as_mut())?
        };
        self.reporter.resolution_finished(&resolution);
        self.reporter
            .phase_entered(BootstrapPhase::ResolutionReported);
        let outcome = BootstrapOutcome::Resolved(resolution);
        write_status(out, &outcome.status_message())?;
        Ok(outcome)
    }
}
