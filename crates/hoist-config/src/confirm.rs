//! Operator confirmation policy applied before any download starts.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the loader obtains consent before contacting remote repositories.
///
/// `Prompt` keeps the interactive behaviour. The two `Assume*` variants exist
/// for unattended environments such as container builds, where no terminal
/// is attached to answer the question.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ConfirmPolicy {
    /// Ask on the terminal and block until the operator answers.
    #[default]
    Prompt,
    /// Accept without asking.
    AssumeYes,
    /// Decline without asking.
    AssumeNo,
}

/// Errors encountered while parsing a [`ConfirmPolicy`] from text.
pub type ConfirmPolicyParseError = strum::ParseError;
