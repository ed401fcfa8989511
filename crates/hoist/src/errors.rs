//! Error types for the loader runtime.

use std::sync::Arc;

use hoist_config::LayoutError;
use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("arguments after '--' are only accepted when launching the application")]
    ForwardedToResolve,
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to locate the artifact: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

/// Exit code for invocation errors.
pub(crate) const USAGE_EXIT_CODE: u8 = 2;

impl AppError {
    #[cfg(test)]
    pub(crate) const fn is_usage(&self) -> bool {
        matches!(self, Self::CliUsage(_) | Self::ForwardedToResolve)
    }

    /// Process exit code for this failure.
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::CliUsage(_) | Self::ForwardedToResolve => USAGE_EXIT_CODE,
            Self::Bootstrap(error) => error.exit_code(),
            Self::LoadConfiguration(_) | Self::Telemetry(_) | Self::Layout(_) => 1,
        }
    }
}
