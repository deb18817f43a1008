//! Personal dotfile manager.
//!
//! A repository holds dotfiles plus a `config.toml` mapping each source file
//! to a destination path. The `deck` binary links destinations to their
//! sources, restores what it displaced, and syncs edits made on the machine
//! back into the repository through git.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate `config.toml`
//! - **[`resources`]**: per-file `plan + apply` primitives (link, unlink, sync)
//! - **[`context`]**: the services and settings a command runs against
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `unlink`, `sync`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod vcs;

/// Version string reported by `deck version` and `deck --version`.
pub const VERSION: &str = match option_env!("DOTDECK_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
