use crate::confirm::ConfirmPolicy;
use crate::logging::LogFormat;

/// Default log filter expression used by the loader.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Seconds allowed for establishing a connection to a single repository.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Seconds allowed between sending a request and receiving the response head.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

/// Seconds allowed for receiving one complete artifact body.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 900;

/// Default log filter expression used by the loader.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format. The loader runs in front of an operator's
/// terminal, so single-line human output wins over JSON.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default confirmation behaviour before downloads start.
pub fn default_confirm_policy() -> ConfirmPolicy {
    ConfirmPolicy::Prompt
}
