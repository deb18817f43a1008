//! Version-control capability used by `sync`.
//!
//! The [`VersionControl`] trait is the narrow set of operations the sync
//! orchestrator needs; [`Git`] implements it by shelling out to `git`
//! through an [`Executor`].
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::VersionControlError;
use crate::exec::{Executor, INTERACTIVE_GIT_ENV, command_line};

/// Operations on the repository that tracks the dotfiles.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Whether `path` has uncommitted modifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be queried.
    fn is_dirty(&self, path: &Path) -> Result<bool, VersionControlError>;

    /// Stage exactly `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error if staging fails.
    fn stage(&self, paths: &[PathBuf]) -> Result<(), VersionControlError>;

    /// Commit exactly `paths` with `message`, leaving anything else in the
    /// index uncommitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<(), VersionControlError>;

    /// Fetch from the upstream remote.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    fn fetch(&self) -> Result<(), VersionControlError>;

    /// Pull from upstream, refusing anything but a fast-forward.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull fails, including when histories diverged.
    fn pull_ff_only(&self) -> Result<(), VersionControlError>;

    /// Number of local commits not yet on the upstream branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the count cannot be determined.
    fn ahead_count(&self) -> Result<u32, VersionControlError>;

    /// Push to upstream; `force` uses `--force-with-lease`.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails.
    fn push(&self, force: bool) -> Result<(), VersionControlError>;

    /// Discard local state and move to the upstream commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset fails.
    fn reset_to_upstream(&self) -> Result<(), VersionControlError>;
}

/// [`VersionControl`] backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct Git {
    repo: PathBuf,
    executor: Arc<dyn Executor>,
}

impl Git {
    /// Drive the repository whose work tree contains `repo`.
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>, executor: Arc<dyn Executor>) -> Self {
        Self {
            repo: repo.into(),
            executor,
        }
    }

    fn capture(&self, args: &[&str]) -> Result<String, VersionControlError> {
        Ok(self.executor.run_in(&self.repo, "git", args)?.stdout)
    }

    /// Run with the terminal attached so git can ask for credentials.
    fn interactive(&self, args: &[&str]) -> Result<(), VersionControlError> {
        Ok(self
            .executor
            .run_interactive(&self.repo, "git", args, INTERACTIVE_GIT_ENV)?)
    }
}

impl VersionControl for Git {
    fn is_dirty(&self, path: &Path) -> Result<bool, VersionControlError> {
        let path = path.to_string_lossy();
        let out = self.capture(&["status", "--porcelain", "--", &path])?;
        Ok(!out.trim().is_empty())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<(), VersionControlError> {
        let paths = lossy(paths);
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.capture(&args).map(drop)
    }

    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<(), VersionControlError> {
        let paths = lossy(paths);
        let mut args = vec!["commit", "-m", message, "--only", "--"];
        args.extend(paths.iter().map(String::as_str));
        // Interactive so signing or hook prompts reach the terminal.
        self.interactive(&args)
    }

    fn fetch(&self) -> Result<(), VersionControlError> {
        self.interactive(&["fetch"])
    }

    fn pull_ff_only(&self) -> Result<(), VersionControlError> {
        self.interactive(&["pull", "--ff-only"])
    }

    fn ahead_count(&self) -> Result<u32, VersionControlError> {
        let args = ["rev-list", "--count", "@{u}..HEAD"];
        let out = self.capture(&args)?;
        out.trim()
            .parse()
            .map_err(|_| VersionControlError::UnexpectedOutput {
                command: command_line("git", &args),
                output: out.trim().to_string(),
            })
    }

    fn push(&self, force: bool) -> Result<(), VersionControlError> {
        if force {
            self.interactive(&["push", "--force-with-lease"])
        } else {
            self.interactive(&["push"])
        }
    }

    fn reset_to_upstream(&self) -> Result<(), VersionControlError> {
        self.capture(&["reset", "--hard", "@{u}"]).map(drop)
    }
}

fn lossy(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

/// Commit message for a sync from `host` at `timestamp`.
#[must_use]
pub fn commit_message(host: &str, timestamp: &str) -> String {
    format!("Sync from {host} at {timestamp}")
}
