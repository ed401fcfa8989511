//! Log routing for the loader process.
//!
//! Records go to stderr only. Stdout carries the `[hoist] ` status lines and,
//! after launch, the application's own output, so nothing here may write to
//! it.

use std::io::{self, IsTerminal};

use hoist_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Proof that the process-wide subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Failures while setting up log routing.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid `EnvFilter` directive list.
    #[error("invalid log filter '{expression}': {message}")]
    Filter {
        /// Expression taken from configuration.
        expression: String,
        /// Parser diagnostic.
        message: String,
    },
    /// A different global subscriber was registered first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Routes `tracing` events to stderr according to `config`.
///
/// Only the first successful call registers a subscriber; the configuration
/// passed to later calls is ignored.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable `log_filter` and
/// [`TelemetryError::Subscriber`] when some other subscriber already owns
/// the global slot.
///
/// # Examples
///
/// ```rust
/// use hoist::telemetry;
/// use hoist_config::Config;
///
/// # fn main() -> Result<(), hoist::telemetry::TelemetryError> {
/// let config = Config::default();
/// telemetry::initialise(&config)?;
/// telemetry::initialise(&config)?;
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let filter = parse_filter(config.log_filter())?;
            let subscriber = stderr_subscriber(config.log_format(), filter);
            tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        expression: expression.to_owned(),
        message: error.to_string(),
    })
}

fn stderr_subscriber(format: LogFormat, filter: EnvFilter) -> Box<dyn Subscriber + Send + Sync> {
    let base = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true);
    match format {
        LogFormat::Compact => Box::new(base.compact().finish()),
        LogFormat::Json => Box::new(base.json().flatten_event(true).finish()),
    }
}
