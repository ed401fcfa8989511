//! Configuration loading helpers for the loader CLI.
//!
//! Loader flags are peeled off the front of the argument list and handed to
//! `ortho_config`; whatever follows is the bootstrap invocation proper.

use std::ffi::{OsStr, OsString};

use hoist_config::Config;
use ortho_config::OrthoConfig;

use crate::errors::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`hoist_config::Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--connect-timeout-secs",
    "--read-timeout-secs",
    "--download-timeout-secs",
    "--confirm",
    "--artifact-root",
];

/// Boolean loader flags; these never consume a following value.
pub(crate) const CONFIG_CLI_SWITCHES: &[&str] = &["--ignore-env-proxy"];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the filtered loader arguments.
    ///
    /// Loader flags must precede the bootstrap arguments. A loader flag
    /// after `resolve-dependencies` is treated as a bootstrap argument.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Stop;
    }
    let (flag, inline_value) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (text.as_ref(), false),
    };
    if CONFIG_CLI_SWITCHES.contains(&flag) {
        return FlagAction::Include { needs_value: false };
    }
    if CONFIG_CLI_FLAGS.contains(&flag) {
        return FlagAction::Include {
            needs_value: !inline_value,
        };
    }
    FlagAction::Stop
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    /// Program name followed by every recognised loader flag.
    pub(crate) config_arguments: Vec<OsString>,
    /// Program name followed by the remaining bootstrap arguments.
    pub(crate) command_arguments: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let mut remaining = args.iter();
    let program = remaining
        .next()
        .cloned()
        .unwrap_or_else(|| OsString::from("hoist"));

    let mut config_arguments = vec![program.clone()];
    let mut rest = remaining.as_slice();
    while let Some((argument, tail)) = rest.split_first() {
        match classify_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                rest = tail;
                if needs_value {
                    if let Some((value, after_value)) = rest.split_first() {
                        config_arguments.push(value.clone());
                        rest = after_value;
                    }
                }
            }
            FlagAction::Stop => break,
        }
    }

    let mut command_arguments = vec![program];
    command_arguments.extend(rest.iter().cloned());
    ConfigArgumentSplit {
        config_arguments,
        command_arguments,
    }
}
