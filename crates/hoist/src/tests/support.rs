//! Shared doubles and fixtures for loader tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io::{Cursor, Read};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use camino::Utf8PathBuf;
use hoist_config::{ArtifactLayout, Config, ConfirmPolicy};
use hoist_resolver::{
    ArtifactTransport, BootstrapManifest, Dependency, FetchError, ResolutionOutcome,
};
use rstest::fixture;
use tempfile::TempDir;

use crate::bootstrap::{BootstrapError, BootstrapPhase};
use crate::config::ConfigLoader;
use crate::errors::AppError;
use crate::health::BootstrapReporter;
use crate::launch::{Application, ApplicationRegistry, LaunchError};
use crate::{IoStreams, Runtime};

// ---------------------------------------------------------------------------
// Artifact on disk
// ---------------------------------------------------------------------------

pub(crate) struct Artifact {
    dir: TempDir,
}

impl Artifact {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub(crate) fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::from_root(self.dir.path())
    }

    pub(crate) fn write_manifest(&self, entry_point: &str, repository: &str, deps: &[&str]) {
        let mut text = format!("main-class={entry_point}\n");
        if !repository.is_empty() {
            text.push_str(&format!("repository-paths={repository}\n"));
        }
        if !deps.is_empty() {
            text.push_str(&format!("dependency-paths={}\n", deps.join(",")));
        }
        fs::write(self.layout().manifest_path(), text).expect("write manifest");
    }

    pub(crate) fn write_raw_manifest(&self, text: &str) {
        fs::write(self.layout().manifest_path(), text).expect("write manifest");
    }

    pub(crate) fn seed_cache(&self, name: &str) {
        let layout = self.layout();
        fs::create_dir_all(layout.cache_dir()).expect("create cache");
        fs::write(layout.cache_dir().join(name), b"cached").expect("seed cache");
    }

    pub(crate) fn cached(&self, name: &str) -> bool {
        self.layout().cache_dir().join(name).is_file()
    }

    pub(crate) fn cache_exists(&self) -> bool {
        self.layout().cache_dir().exists()
    }

    pub(crate) fn config(&self, confirm: ConfirmPolicy) -> Config {
        Config {
            artifact_root: Some(
                Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("utf8 temp path"),
            ),
            confirm,
            ..Config::default()
        }
    }

    pub(crate) fn manifest(&self) -> BootstrapManifest {
        BootstrapManifest::load(self.layout().manifest_path()).expect("load manifest")
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub(crate) struct StaticConfigLoader {
    config: Config,
    seen: RefCell<Vec<Vec<OsString>>>,
}

impl StaticConfigLoader {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            seen: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        self.seen.borrow_mut().push(args.to_vec());
        Ok(self.config.clone())
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Serves canned bodies by URL; anything else answers `404`.
#[derive(Default)]
pub(crate) struct StubTransport {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    pub(crate) fn serving(urls: &[&str]) -> Self {
        Self {
            bodies: urls
                .iter()
                .map(|url| ((*url).to_owned(), b"artifact".to_vec()))
                .collect(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ArtifactTransport for StubTransport {
    fn open(&self, url: &str) -> Result<Box<dyn Read + '_>, FetchError> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.bodies.get(url) {
            Some(body) => Ok(Box::new(Cursor::new(body.clone()))),
            None => Err(FetchError::Status {
                url: url.to_owned(),
                status: 404,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct RecordingReporter {
    phases: RefCell<Vec<BootstrapPhase>>,
    missing: RefCell<Option<Vec<String>>>,
    outcome: RefCell<Option<ResolutionOutcome>>,
    failures: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn phases(&self) -> Vec<BootstrapPhase> {
        self.phases.borrow().clone()
    }

    pub(crate) fn missing(&self) -> Option<Vec<String>> {
        self.missing.borrow().clone()
    }

    pub(crate) fn outcome(&self) -> Option<ResolutionOutcome> {
        self.outcome.borrow().clone()
    }

    pub(crate) fn failures(&self) -> Vec<String> {
        self.failures.borrow().clone()
    }
}

impl BootstrapReporter for RecordingReporter {
    fn phase_entered(&self, phase: BootstrapPhase) {
        self.phases.borrow_mut().push(phase);
    }

    fn manifest_loaded(&self, _manifest: &BootstrapManifest) {}

    fn dependencies_checked(&self, _required: usize, missing: &[Dependency]) {
        *self.missing.borrow_mut() = Some(
            missing
                .iter()
                .map(|dependency| dependency.basename().to_owned())
                .collect(),
        );
    }

    fn resolution_finished(&self, outcome: &ResolutionOutcome) {
        *self.outcome.borrow_mut() = Some(outcome.clone());
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.failures.borrow_mut().push(error.to_string());
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Records every launch; optionally fails.
#[derive(Clone, Default)]
pub(crate) struct RecordingApplication {
    launches: Arc<Mutex<Vec<Vec<OsString>>>>,
    fail: bool,
}

impl RecordingApplication {
    pub(crate) fn failing() -> Self {
        Self {
            launches: Arc::default(),
            fail: true,
        }
    }

    pub(crate) fn launches(&self) -> Vec<Vec<OsString>> {
        self.launches.lock().expect("launch log").clone()
    }
}

impl Application for RecordingApplication {
    fn launch(&self, args: &[OsString]) -> Result<(), LaunchError> {
        self.launches.lock().expect("launch log").push(args.to_vec());
        if self.fail {
            return Err(LaunchError::Failed {
                name: String::from("recording"),
                message: String::from("scripted failure"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Behaviour world
// ---------------------------------------------------------------------------

/// Entry point name registered by [`TestWorld`].
pub(crate) const WORLD_ENTRY_POINT: &str = "app";

/// Repository the behaviour scenarios resolve against.
pub(crate) const WORLD_REPOSITORY: &str = "http://repo.example/";

pub(crate) struct TestWorld {
    pub(crate) artifact: Artifact,
    pub(crate) policy: ConfirmPolicy,
    pub(crate) published: Vec<String>,
    pub(crate) application: RecordingApplication,
    pub(crate) exit_code: Option<ExitCode>,
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            artifact: Artifact::new(),
            policy: ConfirmPolicy::AssumeNo,
            published: Vec::new(),
            application: RecordingApplication::default(),
            exit_code: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }
}

impl TestWorld {
    pub(crate) fn require(&self, dependency: &str) {
        self.artifact
            .write_manifest(WORLD_ENTRY_POINT, WORLD_REPOSITORY, &[dependency]);
    }

    /// Runs the loader with whitespace-separated bootstrap arguments.
    pub(crate) fn run(&mut self, arguments: &str) {
        let loader = StaticConfigLoader::new(self.artifact.config(self.policy));
        let mut registry = ApplicationRegistry::new();
        registry
            .register(WORLD_ENTRY_POINT, self.application.clone())
            .expect("register application");
        let reporter = RecordingReporter::default();
        let runtime = Runtime {
            loader: &loader,
            registry: &registry,
            reporter: &reporter,
        };
        let published: Vec<&str> = self.published.iter().map(String::as_str).collect();
        let transport = StubTransport::serving(&published);
        let args = std::iter::once("hoist")
            .chain(arguments.split_whitespace())
            .map(OsString::from);

        self.stdout.clear();
        self.stderr.clear();
        let exit = runtime.execute(
            args,
            IoStreams::new(&b""[..], &mut self.stdout, &mut self.stderr),
            |_| transport,
        );
        self.exit_code = Some(exit);
    }

    pub(crate) fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub(crate) fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[fixture]
pub(crate) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
