use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, SyncOpts};
use crate::config::Config;
use crate::context::Context;
use crate::logging::{EntryStatus, Logger};
use crate::resources::sync::{SyncAction, copy_back};
use crate::vcs;

/// Which half of the round trip to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Copy back, commit, pull `--ff-only`, push if ahead.
    Full,
    /// Only pull from upstream.
    PullOnly,
    /// Copy back and commit, then push without pulling.
    PushOnly,
}

/// Resolved `sync` options.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Copy clean files too; force-push or hard-reset depending on mode.
    pub force: bool,
    /// Which half of the round trip to perform.
    pub mode: SyncMode,
}

impl From<&SyncOpts> for SyncOptions {
    fn from(opts: &SyncOpts) -> Self {
        let mode = match (opts.pull, opts.push) {
            (true, _) => SyncMode::PullOnly,
            (_, true) => SyncMode::PushOnly,
            _ => SyncMode::Full,
        };
        Self {
            force: opts.force,
            mode,
        }
    }
}

/// Run the sync command.
///
/// # Errors
///
/// Returns an error on the first failure; sync never continues past one.
pub fn run(global: &GlobalOpts, opts: &SyncOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    sync_all(&setup.ctx, &setup.config, SyncOptions::from(opts))?;
    log.print_summary();
    Ok(())
}

/// Synchronize the repository with this machine according to `opts`.
///
/// # Errors
///
/// Returns an error if `git` is not installed, a file cannot be compared or
/// copied, or any version-control step fails.
pub fn sync_all(ctx: &Context, config: &Config, opts: SyncOptions) -> Result<()> {
    if !ctx.executor.which("git") {
        anyhow::bail!("git is required for sync but was not found on PATH");
    }

    match opts.mode {
        SyncMode::PullOnly => pull(ctx, opts.force),
        SyncMode::Full => {
            let changed = copy_changes(ctx, config, opts.force)?;
            if changed.is_empty() {
                ctx.log.info("nothing to sync");
                return Ok(());
            }
            commit_changes(ctx, &changed)?;
            pull_ff_only(ctx)?;
            push_if_ahead(ctx, false)
        }
        SyncMode::PushOnly => {
            let changed = copy_changes(ctx, config, opts.force)?;
            if changed.is_empty() {
                ctx.log.info("no local changes to commit");
            } else {
                commit_changes(ctx, &changed)?;
            }
            push_if_ahead(ctx, opts.force)
        }
    }
}

/// Copy every modified destination back over its source and return the
/// sources that changed.  In dry-run nothing is written, but the sources
/// that would change are still returned.
fn copy_changes(ctx: &Context, config: &Config, force: bool) -> Result<Vec<PathBuf>> {
    ctx.log.stage("Copying local changes into the repository");
    let mut changed = Vec::new();

    for entry in &config.files {
        let file = ctx.managed_file(entry);
        let name = file.destination.display().to_string();
        let action = SyncAction::plan(&file, ctx.fs_ops.as_ref(), ctx.vcs.as_ref(), force)
            .with_context(|| format!("cannot sync {name}"))?;

        if let Some(reason) = action.skip_reason() {
            ctx.log.debug(&format!("skipping {}: {reason}", entry.source));
            ctx.log.record_entry(&name, EntryStatus::Skipped, Some(reason));
            continue;
        }

        let arrow = format!("{name} → {}", file.source.display());
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would copy {arrow}"));
            ctx.log.record_entry(&name, EntryStatus::DryRun, None);
        } else {
            copy_back(&file, ctx.fs_ops.as_ref())?;
            ctx.log.info(&format!("↩ {arrow}"));
            ctx.log.record_entry(&name, EntryStatus::Ok, Some("copied"));
        }
        changed.push(file.source);
    }
    Ok(changed)
}

fn commit_changes(ctx: &Context, changed: &[PathBuf]) -> Result<()> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let message = vcs::commit_message(&ctx.platform.hostname, &timestamp);

    ctx.log.stage("Committing");
    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would stage {} file(s)", changed.len()));
        ctx.log.dry_run(&format!("would commit: {message}"));
        return Ok(());
    }

    ctx.vcs.stage(changed)?;
    ctx.vcs.commit(&message, changed)?;
    ctx.log.info(&format!("committed {} file(s)", changed.len()));
    Ok(())
}

fn pull_ff_only(ctx: &Context) -> Result<()> {
    ctx.log.stage("Pulling latest changes");
    if ctx.dry_run {
        ctx.log.dry_run("would pull --ff-only from upstream");
        return Ok(());
    }
    ctx.vcs
        .pull_ff_only()
        .context("cannot fast-forward to upstream; the branches have diverged")
}

fn push_if_ahead(ctx: &Context, force: bool) -> Result<()> {
    ctx.log.stage("Pushing");
    if ctx.dry_run {
        let how = if force { " with --force-with-lease" } else { "" };
        ctx.log
            .dry_run(&format!("would push{how} if ahead of upstream"));
        return Ok(());
    }

    ctx.vcs.fetch()?;
    let ahead = ctx.vcs.ahead_count()?;
    if ahead == 0 {
        ctx.log.info("nothing to push, branch is up to date");
        return Ok(());
    }
    ctx.log.info(&format!("pushing {ahead} commit(s)"));
    ctx.vcs.push(force)?;
    Ok(())
}

fn pull(ctx: &Context, force: bool) -> Result<()> {
    if !force {
        return pull_ff_only(ctx);
    }

    ctx.log.stage("Resetting to upstream");
    if ctx.dry_run {
        ctx.log.dry_run("would fetch and reset --hard to upstream");
        return Ok(());
    }
    ctx.vcs.fetch()?;
    ctx.log
        .warn("discarding local commits and changes in the repository");
    ctx.vcs.reset_to_upstream()?;
    Ok(())
}
