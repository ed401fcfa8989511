//! Bootstrap argument definitions.

use std::ffi::OsString;

use clap::{Parser, ValueEnum};

use crate::errors::AppError;

/// Commands accepted in place of the default run mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum BootstrapCommand {
    /// Download missing dependencies after confirmation; never launches.
    ResolveDependencies,
}

/// Command-line interface for the bootstrap loader.
///
/// Loader configuration flags (`--confirm`, `--artifact-root`, ...) are
/// stripped before this parser runs.
#[derive(Parser, Debug)]
#[command(
    name = "hoist",
    version,
    about = "Verify an application's dependencies, fetch what is missing, and launch it",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Omit to launch the application; `resolve-dependencies` to download.
    #[arg(value_enum, value_name = "COMMAND")]
    pub(crate) command: Option<BootstrapCommand>,
    /// Arguments after `--`, forwarded to the application in run mode.
    #[arg(last = true, value_name = "APP_ARGS")]
    pub(crate) forwarded: Vec<OsString>,
}

/// Classified bootstrap invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invocation {
    /// Launch the application when every dependency is present.
    Run {
        /// Arguments handed to the application unchanged.
        forwarded: Vec<OsString>,
    },
    /// Download missing dependencies and report.
    Resolve,
}

impl Invocation {
    /// Returns the argument that selects this mode, if any.
    #[must_use]
    pub const fn command_name(&self) -> Option<&'static str> {
        match self {
            Self::Run { .. } => None,
            Self::Resolve => Some("resolve-dependencies"),
        }
    }
}

impl TryFrom<Cli> for Invocation {
    type Error = AppError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        match cli.command {
            None => Ok(Self::Run {
                forwarded: cli.forwarded,
            }),
            Some(BootstrapCommand::ResolveDependencies) if cli.forwarded.is_empty() => {
                Ok(Self::Resolve)
            }
            Some(BootstrapCommand::ResolveDependencies) => Err(AppError::ForwardedToResolve),
        }
    }
}
