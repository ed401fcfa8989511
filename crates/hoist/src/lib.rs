//! Runtime for the `hoist` bootstrap loader.
//!
//! `hoist` sits next to an application artifact and guarantees that the
//! application only starts once every third-party artifact it depends on is
//! present in the artifact's local cache directory. A bare invocation checks
//! the cache and launches the entry point named by the bootstrap manifest;
//! `hoist resolve-dependencies` asks for confirmation and downloads whatever
//! is missing from the manifest's repositories.
//!
//! The runtime can be exercised from the binary or from tests, with the
//! configuration loader, transport, application registry, reporter and
//! standard streams all substituted.
//!
//! Loader processes sharing one cache directory are not coordinated.
//! Downloads are staged and renamed into place, which narrows but does not
//! close the window for two concurrent resolutions writing the same file.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use hoist_config::{ArtifactLayout, Config};
use hoist_resolver::confirm::STATUS_PREFIX;
use hoist_resolver::{ArtifactTransport, HttpTransport, TransportSettings};

pub mod bootstrap;
mod cli;
mod config;
mod errors;
pub mod health;
pub mod launch;
pub mod telemetry;

pub use bootstrap::{BootstrapError, BootstrapOutcome, BootstrapPhase, Bootstrapper};
pub use cli::Invocation;
pub use health::{BootstrapReporter, StructuredReporter};
pub use launch::{Application, ApplicationRegistry, LaunchError, ProcessApplication};
pub use telemetry::{TelemetryError, TelemetryHandle};

use crate::cli::Cli;
use crate::config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use crate::errors::AppError;

/// Bundles the standard streams handed to the runtime.
pub(crate) struct IoStreams<'a, R: BufRead, W: Write, E: Write> {
    pub(crate) stdin: R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, R: BufRead, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) const fn new(stdin: R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

/// Runs the loader with only `exec:` entry points available.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    run_with_registry(args, stdin, stdout, stderr, &ApplicationRegistry::new())
}

/// Runs the loader, resolving entry points through `registry` first.
///
/// Binaries that link their application into the loader register it here
/// under the name their manifest's `main-class` uses.
#[must_use]
pub fn run_with_registry<I, R, W, E>(
    args: I,
    stdin: R,
    stdout: &mut W,
    stderr: &mut E,
    registry: &ApplicationRegistry,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let io = IoStreams::new(stdin, stdout, stderr);
    let runtime = Runtime {
        loader: &OrthoConfigLoader,
        registry,
        reporter: &StructuredReporter,
    };
    runtime.execute(args, io, http_transport)
}

fn http_transport(config: &Config) -> HttpTransport {
    HttpTransport::new(
        &TransportSettings::default()
            .with_connect_timeout(config.connect_timeout())
            .with_read_timeout(config.read_timeout())
            .with_download_timeout(config.download_timeout())
            .with_env_proxy(config.use_env_proxy()),
    )
}

pub(crate) struct Runtime<'a, L: ConfigLoader> {
    pub(crate) loader: &'a L,
    pub(crate) registry: &'a ApplicationRegistry,
    pub(crate) reporter: &'a dyn BootstrapReporter,
}

impl<L: ConfigLoader> Runtime<'_, L> {
    pub(crate) fn execute<I, R, W, E, T, F>(
        &self,
        args: I,
        io: IoStreams<'_, R, W, E>,
        make_transport: F,
    ) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
        R: BufRead,
        W: Write,
        E: Write,
        T: ArtifactTransport,
        F: FnOnce(&Config) -> T,
    {
        let IoStreams {
            stdin,
            stdout,
            stderr,
        } = io;
        match self.try_execute(args, stdin, &mut *stdout, make_transport) {
            Ok(outcome) => ExitCode::from(outcome.exit_code()),
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                let _ = write!(stdout, "{error}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                let _ = writeln!(stderr, "{STATUS_PREFIX}{error}");
                ExitCode::from(error.exit_code())
            }
        }
    }

    fn try_execute<I, R, W, T, F>(
        &self,
        args: I,
        stdin: R,
        stdout: &mut W,
        make_transport: F,
    ) -> Result<BootstrapOutcome, AppError>
    where
        I: IntoIterator<Item = OsString>,
        R: BufRead,
        W: Write,
        T: ArtifactTransport,
        F: FnOnce(&Config) -> T,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli = Cli::try_parse_from(&split.command_arguments).map_err(AppError::CliUsage)?;
        let invocation = Invocation::try_from(cli)?;

        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;
        let layout = ArtifactLayout::from_config(&config)?;

        let bootstrapper =
            Bootstrapper::new(&layout, self.registry, self.reporter, make_transport(&config));
        let outcome = bootstrapper.run(&invocation, config.confirm_policy(), stdin, stdout)?;
        Ok(outcome)
    }
}
