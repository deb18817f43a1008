use clap::{Args, Parser, Subcommand};

/// Top-level CLI entry point for the dotfile manager.
#[derive(Parser, Debug)]
#[command(
    name = "deck",
    about = "DotDeck - simple, clear dotfile linking",
    version = crate::VERSION,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show detailed output of every step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Simulate actions without making changes
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Repository root containing config.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link all files from config.toml
    Link,
    /// Remove symlinks and restore backups
    Unlink(UnlinkOpts),
    /// Sync dotfiles from the system to the repo, commit, pull and push
    Sync(SyncOpts),
    /// Print version information
    Version,
}

/// Options for the `unlink` subcommand.
#[derive(Args, Debug, Clone)]
pub struct UnlinkOpts {
    /// Remove symlinks without a backup without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Options for the `sync` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SyncOpts {
    /// Sync even if git shows a clean status; with --push, force-with-lease;
    /// with --pull, reset to upstream
    #[arg(short, long)]
    pub force: bool,

    /// Only pull from upstream, without copying files back
    #[arg(long, conflicts_with = "push")]
    pub pull: bool,

    /// Copy and commit, then push without pulling first
    #[arg(long)]
    pub push: bool,
}
