//! Output shape of the loader's log records.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Rendering used for log records on stderr.
///
/// Operator status lines on stdout are unaffected by this choice.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per record with event fields at the top level.
    Json,
    /// Terse text lines for a terminal.
    #[default]
    Compact,
}

/// Returned when text names no known [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
