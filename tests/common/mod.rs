// Shared helpers for integration tests.
//
// Provides a temporary repository root and home directory, a fluent builder
// for `config.toml` and source files, and in-memory stand-ins for the
// process and git seams so sync can run without a real remote.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotdeck::config::Config;
use dotdeck::context::Context;
use dotdeck::error::VersionControlError;
use dotdeck::exec::{ExecError, ExecResult, Executor};
use dotdeck::logging::{EntryStatus, Logger};
use dotdeck::platform::Platform;
use dotdeck::prompt::PresetConfirm;
use dotdeck::vcs::VersionControl;

/// An isolated repository and home directory backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    tmp: tempfile::TempDir,
    /// Repository root holding `config.toml`.
    pub root: PathBuf,
    /// Directory that `~/` expands to.
    pub home: PathBuf,
}

impl IntegrationTestContext {
    /// Create empty `repo/` and `home/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = tmp.path().join("repo");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&root).expect("create repo dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self { tmp, root, home }
    }

    /// Path under the home directory.
    pub fn home_path(&self, relative: &str) -> PathBuf {
        self.home.join(relative)
    }

    /// Path under the repository root.
    pub fn repo_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Load `config.toml` from the repository root.
    pub fn load_config(&self) -> Config {
        Config::load(&self.root).expect("load config")
    }

    /// Context on the real filesystem that answers every prompt with
    /// `confirm` and uses `vcs` for git operations.
    pub fn context(
        &self,
        log: &Arc<Logger>,
        dry_run: bool,
        confirm: bool,
        vcs: &Arc<FakeVcs>,
    ) -> Context {
        Context::new(
            self.root.clone(),
            Arc::new(Platform::new(Some(self.home.clone()), "integration")),
            Arc::clone(log) as Arc<dyn dotdeck::logging::Log>,
            dry_run,
            Arc::new(FakeExecutor::default()),
        )
        .with_confirm(Arc::new(PresetConfirm(confirm)))
        .with_vcs(Arc::clone(vcs) as Arc<dyn VersionControl>)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    mappings: Vec<(String, String)>,
}

impl TestContextBuilder {
    /// Begin building a new context with an empty mapping.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
            mappings: Vec::new(),
        }
    }

    /// Write `repo/<source>` and map it to `destination`.
    pub fn with_file(mut self, source: &str, content: &str, destination: &str) -> Self {
        let path = self.ctx.root.join(source);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
        self.mappings
            .push((source.to_string(), destination.to_string()));
        self
    }

    /// Write `content` to `~/<relative>` before the command runs.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.home.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(&path, content).expect("write home file");
        self
    }

    /// Write `config.toml` and return the finished context.
    pub fn build(self) -> IntegrationTestContext {
        let mut toml = String::from("[files]\n");
        for (source, destination) in &self.mappings {
            let _ = writeln!(toml, "{source:?} = {destination:?}");
        }
        std::fs::write(self.ctx.root.join("config.toml"), toml).expect("write config.toml");
        self.ctx
    }
}

/// Logger that keeps entries in memory and writes no log file.
pub fn quiet_logger() -> Arc<Logger> {
    Arc::new(Logger::with_log_file(None))
}

/// Statuses of every recorded entry, in order.
pub fn statuses(log: &Logger) -> Vec<EntryStatus> {
    log.entries().iter().map(|e| e.status).collect()
}

/// Executor that succeeds without spawning anything and reports every
/// program as installed.
#[derive(Debug, Default)]
pub struct FakeExecutor;

impl Executor for FakeExecutor {
    fn run_in(&self, _dir: &Path, _program: &str, _args: &[&str]) -> Result<ExecResult, ExecError> {
        Ok(ExecResult {
            success: true,
            code: Some(0),
            ..ExecResult::default()
        })
    }

    fn run_interactive(
        &self,
        _dir: &Path,
        _program: &str,
        _args: &[&str],
        _env: &[(&str, &str)],
    ) -> Result<(), ExecError> {
        Ok(())
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// In-memory [`VersionControl`] that records every call.
#[derive(Debug, Default)]
pub struct FakeVcs {
    dirty: HashSet<PathBuf>,
    ahead: u32,
    calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    /// Report `path` as having uncommitted modifications.
    pub fn with_dirty(mut self, path: PathBuf) -> Self {
        self.dirty.insert(path);
        self
    }

    /// Report `count` commits ahead of upstream once something is committed.
    pub const fn with_ahead(mut self, count: u32) -> Self {
        self.ahead = count;
        self
    }

    /// Every operation performed, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl VersionControl for FakeVcs {
    fn is_dirty(&self, path: &Path) -> Result<bool, VersionControlError> {
        Ok(self.dirty.contains(path))
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<(), VersionControlError> {
        self.record(format!("stage {}", joined(paths)));
        Ok(())
    }

    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<(), VersionControlError> {
        self.record(format!("commit {message} -- {}", joined(paths)));
        Ok(())
    }

    fn fetch(&self) -> Result<(), VersionControlError> {
        self.record("fetch".to_string());
        Ok(())
    }

    fn pull_ff_only(&self) -> Result<(), VersionControlError> {
        self.record("pull --ff-only".to_string());
        Ok(())
    }

    fn ahead_count(&self) -> Result<u32, VersionControlError> {
        Ok(self.ahead)
    }

    fn push(&self, force: bool) -> Result<(), VersionControlError> {
        self.record(if force { "push --force-with-lease" } else { "push" }.to_string());
        Ok(())
    }

    fn reset_to_upstream(&self) -> Result<(), VersionControlError> {
        self.record("reset --hard @{u}".to_string());
        Ok(())
    }
}

fn joined(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
