//! Shared configuration for the `hoist` bootstrap loader.
//!
//! Configuration is layered with `ortho_config`: built-in defaults, then an
//! optional configuration file (`--config-path` or `HOIST_CONFIG_PATH`),
//! then `HOIST_*` environment variables, then command-line flags. The
//! resulting [`Config`] is loaded once at process start and passed down
//! explicitly; nothing here is global state.

mod confirm;
mod defaults;
mod layout;
mod logging;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use confirm::{ConfirmPolicy, ConfirmPolicyParseError};
pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_LOG_FILTER,
    DEFAULT_READ_TIMEOUT_SECS,
    default_confirm_policy, default_log_filter, default_log_filter_string, default_log_format,
};
pub use layout::{ArtifactLayout, CACHE_DIR_NAME, LayoutError, MANIFEST_FILE_NAME};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HOIST")]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `hoist_resolver=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records written to stderr.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Connect timeout applied to every repository request, in seconds.
    #[ortho_config(default = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,
    /// Wait for a repository's status line and headers, in seconds.
    #[ortho_config(default = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout_secs: u64,
    /// Ceiling on transferring one whole artifact body, in seconds.
    #[ortho_config(default = DEFAULT_DOWNLOAD_TIMEOUT_SECS)]
    pub download_timeout_secs: u64,
    /// Consent policy consulted before downloads start.
    #[ortho_config(default = default_confirm_policy())]
    pub confirm: ConfirmPolicy,
    /// Overrides the artifact directory; defaults to the executable's directory.
    pub artifact_root: Option<Utf8PathBuf>,
    /// Ignores `HTTP_PROXY`-style environment variables when set.
    #[ortho_config(default = false)]
    pub ignore_env_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            confirm: default_confirm_policy(),
            artifact_root: None,
            ignore_env_proxy: false,
        }
    }
}

impl Config {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Connect timeout for a single repository request.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Response-head timeout for a single repository request.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Whole-body transfer limit for a single artifact.
    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Returns the configured confirmation policy.
    #[must_use]
    pub const fn confirm_policy(&self) -> ConfirmPolicy {
        self.confirm
    }

    /// Returns the artifact root override, if any.
    #[must_use]
    pub fn artifact_root(&self) -> Option<&camino::Utf8Path> {
        self.artifact_root.as_deref()
    }

    /// Returns `true` when environment proxy settings should be honoured.
    #[must_use]
    pub const fn use_env_proxy(&self) -> bool {
        !self.ignore_env_proxy
    }
}
