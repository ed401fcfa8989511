//! Application entry points.
//!
//! The manifest names its entry point with a plain string. Names registered
//! in an [`ApplicationRegistry`] map to in-process [`Application`]
//! implementations linked into the loader; names of the form
//! `exec:<relative path>` map to a [`ProcessApplication`] that runs an
//! executable shipped inside the artifact.

mod process;

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

pub use self::process::{LIB_DIR_ENV, ProcessApplication};

/// Prefix selecting a bundled executable as the entry point.
pub const EXEC_PREFIX: &str = "exec:";

/// Errors raised while resolving or running the application.
#[derive(Debug, Clone, Error)]
pub enum LaunchError {
    /// The entry point is neither registered nor an `exec:` path.
    #[error("entry point '{name}' is not a registered application")]
    UnknownEntryPoint {
        /// Entry point named by the manifest.
        name: String,
    },

    /// An application with the same name was registered twice.
    #[error("application '{name}' is already registered")]
    Duplicate {
        /// Conflicting name.
        name: String,
    },

    /// The `exec:` path escapes the artifact root or is empty.
    #[error("entry point path '{path}' must be relative to the artifact root")]
    InvalidExecutablePath {
        /// Path as written in the manifest.
        path: String,
    },

    /// The executable could not be started.
    #[error("failed to start '{}': {source}", program.display())]
    Spawn {
        /// Executable path.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The executable ran and reported failure.
    #[error("'{}' exited with {}", program.display(), describe_exit(*code))]
    Exited {
        /// Executable path.
        program: PathBuf,
        /// Exit code, absent when terminated by a signal.
        code: Option<i32>,
    },

    /// An in-process application reported failure.
    #[error("application '{name}' failed: {message}")]
    Failed {
        /// Application name.
        name: String,
        /// Failure description.
        message: String,
    },
}

fn describe_exit(code: Option<i32>) -> String {
    code.map_or_else(
        || String::from("a signal"),
        |value| format!("status {value}"),
    )
}

impl LaunchError {
    /// Exit code the loader should return for this failure.
    ///
    /// A child's own exit status is passed through when it fits.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Exited {
                code: Some(code), ..
            } => u8::try_from(*code)
                .ok()
                .filter(|value| *value != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

/// A launchable application.
pub trait Application {
    /// Runs the application with `args` and returns once it has finished.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the application cannot start or fails.
    fn launch(&self, args: &[OsString]) -> Result<(), LaunchError>;
}

/// Statically registered applications keyed by entry-point name.
///
/// # Example
///
/// ```
/// use std::ffi::OsString;
///
/// use hoist::launch::{Application, ApplicationRegistry, LaunchError};
///
/// struct Hello;
///
/// impl Application for Hello {
///     fn launch(&self, _args: &[OsString]) -> Result<(), LaunchError> {
///         Ok(())
///     }
/// }
///
/// let mut registry = ApplicationRegistry::new();
/// registry.register("hello", Hello).expect("first registration");
/// assert!(registry.get("hello").is_some());
/// ```
#[derive(Default)]
pub struct ApplicationRegistry {
    applications: HashMap<String, Box<dyn Application>>,
}

impl fmt::Debug for ApplicationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.applications.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ApplicationRegistry")
            .field("applications", &names)
            .finish()
    }
}

impl ApplicationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `application` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Duplicate`] when `name` is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        application: impl Application + 'static,
    ) -> Result<(), LaunchError> {
        let key = name.into();
        if self.applications.contains_key(&key) {
            return Err(LaunchError::Duplicate { name: key });
        }
        self.applications.insert(key, Box::new(application));
        Ok(())
    }

    /// Looks up a registered application.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Application> {
        self.applications.get(name).map(Box::as_ref)
    }

    /// Returns the number of registered applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// Reports whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Maps an entry-point name to something launchable.
    ///
    /// Registered names win. Otherwise `exec:<path>` resolves to a bundled
    /// executable under `root`, run with `lib_dir` exported as
    /// [`LIB_DIR_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::UnknownEntryPoint`] for unregistered names and
    /// [`LaunchError::InvalidExecutablePath`] for `exec:` paths that are not
    /// plain relative paths.
    pub fn resolve<'a>(
        &'a self,
        entry_point: &str,
        root: &Path,
        lib_dir: &Path,
    ) -> Result<EntryPoint<'a>, LaunchError> {
        if let Some(application) = self.get(entry_point) {
            return Ok(EntryPoint::Registered(application));
        }
        let Some(relative) = entry_point.strip_prefix(EXEC_PREFIX) else {
            return Err(LaunchError::UnknownEntryPoint {
                name: entry_point.to_owned(),
            });
        };
        let path = Path::new(relative);
        let plain = !relative.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(LaunchError::InvalidExecutablePath {
                path: relative.to_owned(),
            });
        }
        Ok(EntryPoint::Process(ProcessApplication::new(
            root.join(path),
            root,
            lib_dir,
        )))
    }
}

/// Outcome of [`ApplicationRegistry::resolve`].
pub enum EntryPoint<'a> {
    /// An application linked into the loader.
    Registered(&'a dyn Application),
    /// A bundled executable.
    Process(ProcessApplication),
}

impl Application for EntryPoint<'_> {
    fn launch(&self, args: &[OsString]) -> Result<(), LaunchError> {
        match self {
            Self::Registered(application) => application.launch(args),
            Self::Process(process) => process.launch(args),
        }
    }
}
