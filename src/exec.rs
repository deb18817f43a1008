//! External process execution.
//!
//! The [`Executor`] trait is the seam between orchestration logic and real
//! processes.  Production code uses [`SystemExecutor`]; tests swap in the
//! recording executor from [`test_helpers`].
use std::path::Path;
use std::process::{Command, Output, Stdio};

use thiserror::Error;

/// Environment that lets git ask for credentials on the terminal instead of
/// failing in batch mode.
pub const INTERACTIVE_GIT_ENV: &[(&str, &str)] = &[
    ("GIT_TERMINAL_PROMPT", "1"),
    ("GIT_SSH_COMMAND", "ssh -o BatchMode=no"),
];

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Errors from spawning or running an external command.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be started.
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process exited with a non-zero status.
    #[error("`{command}` failed (exit {code}){}", stderr_suffix(.stderr))]
    Failed {
        /// Command line that was run.
        command: String,
        /// Exit code, or `-1` when terminated by a signal.
        code: i32,
        /// Captured standard error (empty for interactive runs).
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Render `program args...` for messages.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Abstraction over process execution.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` in `dir` and capture its output. Fails on non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;

    /// Run `program` in `dir` with stdin, stdout and stderr inherited from
    /// this process, so the child can prompt the user (e.g. for an SSH
    /// passphrase).
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn run_interactive(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<(), ExecError>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] that spawns real processes.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn output(dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        tracing::debug!("running: {}", command_line(program, args));
        Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map(ExecResult::from)
            .map_err(|source| ExecError::Spawn {
                command: command_line(program, args),
                source,
            })
    }
}

impl Executor for SystemExecutor {
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let result = Self::output(dir, program, args)?;
        if !result.success {
            return Err(ExecError::Failed {
                command: command_line(program, args),
                code: result.code.unwrap_or(-1),
                stderr: result.stderr,
            });
        }
        Ok(result)
    }

    fn run_interactive(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<(), ExecError> {
        let command = command_line(program, args);
        tracing::debug!("running (interactive): {command}");
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .envs(env.iter().copied())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Failed {
                command,
                code: status.code().unwrap_or(-1),
                stderr: String::new(),
            })
        }
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
