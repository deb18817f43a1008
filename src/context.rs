use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::MappingEntry;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::paths;
use crate::platform::Platform;
use crate::prompt::{Confirm, StdinConfirm};
use crate::resources::ManagedFile;
use crate::vcs::{Git, VersionControl};

/// Everything an orchestrator needs, passed explicitly instead of read from
/// process-wide flags.
pub struct Context {
    /// Repository root; relative sources and destinations resolve against it.
    pub root: PathBuf,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and entry recording.
    pub log: Arc<dyn Log>,
    /// Plan and report without touching anything.
    pub dry_run: bool,
    /// Command executor.
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction.
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Confirmation strategy for destructive actions.
    pub confirm: Arc<dyn Confirm>,
    /// Version control over the repository at `root`.
    pub vcs: Arc<dyn VersionControl>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &self.executor)
            .field("fs_ops", &self.fs_ops)
            .field("confirm", &self.confirm)
            .field("vcs", &"<dyn VersionControl>")
            .finish()
    }
}

impl Context {
    /// Create a context wired to the real filesystem, stdin prompts and `git`.
    #[must_use]
    pub fn new(
        root: PathBuf,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let vcs = Arc::new(Git::new(root.clone(), Arc::clone(&executor)));
        Self {
            root,
            platform,
            log,
            dry_run,
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
            confirm: Arc::new(StdinConfirm),
            vcs,
        }
    }

    /// Replace the [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Replace the confirmation strategy.
    #[must_use]
    pub fn with_confirm(mut self, confirm: Arc<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Replace the version-control backend.
    #[must_use]
    pub fn with_vcs(mut self, vcs: Arc<dyn VersionControl>) -> Self {
        self.vcs = vcs;
        self
    }

    /// Absolute source path of `entry` inside the repository.
    #[must_use]
    pub fn source_path(&self, entry: &MappingEntry) -> PathBuf {
        paths::resolve(&self.root, Path::new(&entry.source))
    }

    /// Absolute destination path of `entry`, with `~` expanded.
    #[must_use]
    pub fn destination_path(&self, entry: &MappingEntry) -> PathBuf {
        let home = self.platform.home.as_deref();
        if home.is_none() && entry.destination.starts_with('~') {
            self.log.debug(&format!(
                "home directory unknown, leaving {} unexpanded",
                entry.destination
            ));
        }
        let expanded = paths::expand_home(&entry.destination, home);
        paths::resolve(&self.root, &expanded)
    }

    /// Resolve both sides of `entry`.
    #[must_use]
    pub fn managed_file(&self, entry: &MappingEntry) -> ManagedFile {
        ManagedFile::new(self.source_path(entry), self.destination_path(entry))
    }
}
