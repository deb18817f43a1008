//! Domain-specific error types for the dotfile manager.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`FilesystemError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DeckError
//! ├── Config(ConfigError)                 config.toml read/parse
//! ├── Filesystem(FilesystemError)         stat, rename, remove, symlink
//! ├── VersionControl(VersionControlError) git exited non-zero or printed something odd
//! ├── Prompt                              confirmation answer could not be read
//! └── UserAborted                         a confirmation prompt was declined
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::exec::ExecError;

/// Top-level error type for the dotfile manager.
#[derive(Error, Debug)]
pub enum DeckError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A filesystem operation on a managed path failed.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// The version-control tool failed.
    #[error(transparent)]
    VersionControl(#[from] VersionControlError),

    /// The answer to a confirmation prompt could not be read.
    #[error("cannot read confirmation: {source}")]
    Prompt {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The user declined a confirmation prompt for `path`.
    #[error("aborted by user: {}", .path.display())]
    UserAborted {
        /// Path the declined action would have touched.
        path: PathBuf,
    },
}

/// Errors that arise from loading `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file is missing or unreadable.
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("cannot parse config file {}: {source}", .path.display())]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Errors that arise from filesystem operations on managed paths.
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// The path could not be inspected (permissions, I/O).
    #[error("cannot inspect {}: {source}", .path.display())]
    Inspect {
        /// Path that was inspected.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The parent directory of a destination could not be created.
    #[error("cannot create parent directory {}: {source}", .path.display())]
    CreateParent {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An existing destination could not be moved to its backup path.
    #[error("cannot back up {} to {}: {source}", .path.display(), .backup.display())]
    Backup {
        /// Destination being displaced.
        path: PathBuf,
        /// Backup path.
        backup: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A backup could not be moved back into place.
    #[error("cannot restore backup {} to {}: {source}", .backup.display(), .path.display())]
    Restore {
        /// Backup path.
        backup: PathBuf,
        /// Destination being restored.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Linking failed after the destination was moved aside, and moving it
    /// back failed too; the original content is only at `backup`.
    #[error("{link}; original left at {} because moving it back failed: {source}", .backup.display())]
    Stranded {
        /// The symlink failure.
        link: Box<FilesystemError>,
        /// Where the displaced content now lives.
        backup: PathBuf,
        /// Why the rollback rename failed.
        source: std::io::Error,
    },

    /// A symlink could not be removed.
    #[error("cannot remove {}: {source}", .path.display())]
    Remove {
        /// Path that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A symlink could not be created.
    #[error("cannot link {} -> {}: {source}", .link.display(), .target.display())]
    Symlink {
        /// Where the symlink was to be created.
        link: PathBuf,
        /// What the symlink was to point at.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// File content could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// File content could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from driving the version-control binary.
#[derive(Error, Debug)]
pub enum VersionControlError {
    /// The command could not be spawned or exited non-zero.
    #[error(transparent)]
    Command(#[from] ExecError),

    /// The command succeeded but printed something we could not interpret.
    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput {
        /// Command line that was run.
        command: String,
        /// Output that could not be parsed.
        output: String,
    },
}
