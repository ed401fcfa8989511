//! Bundled executables as entry points.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::debug;

use super::{Application, LaunchError};

/// Environment variable pointing the child at the dependency cache.
pub const LIB_DIR_ENV: &str = "HOIST_LIB_DIR";

const LAUNCH_TARGET: &str = "hoist::launch";

/// Runs an executable with inherited standard streams and waits for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessApplication {
    program: PathBuf,
    working_dir: PathBuf,
    lib_dir: PathBuf,
}

impl ProcessApplication {
    /// Describes `program`, run from `working_dir` with [`LIB_DIR_ENV`] set
    /// to `lib_dir`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, working_dir: &Path, lib_dir: &Path) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.to_path_buf(),
            lib_dir: lib_dir.to_path_buf(),
        }
    }
}

impl Application for ProcessApplication {
    fn launch(&self, args: &[OsString]) -> Result<(), LaunchError> {
        debug!(
            target: LAUNCH_TARGET,
            program = %self.program.display(),
            args = args.len(),
            "spawning application"
        );
        let status = Command::new(&self.program)
            .args(args)
            .current_dir(&self.working_dir)
            .env(LIB_DIR_ENV, &self.lib_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source: Arc::new(source),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::Exited {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}
