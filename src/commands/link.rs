use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::context::Context;
use crate::logging::{EntryStatus, Logger};
use crate::resources::link::LinkAction;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any entry failed.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    link_all(&setup.ctx, &setup.config);
    super::finish(log)
}

/// Link every mapping entry, recording one result per entry.
///
/// A failing entry never stops the remaining entries.
pub fn link_all(ctx: &Context, config: &Config) {
    ctx.log.stage("Linking files");

    for entry in &config.files {
        let file = ctx.managed_file(entry);
        let name = file.destination.display().to_string();
        ctx.log.debug(&format!("checking {name}"));

        if !ctx.fs_ops.exists(&file.source) {
            ctx.log
                .warn(&format!("source {} does not exist", file.source.display()));
        }

        let action = match LinkAction::plan(&file, ctx.fs_ops.as_ref()) {
            Ok(action) => action,
            Err(e) => {
                ctx.log.error(&e.to_string());
                ctx.log
                    .record_entry(&name, EntryStatus::Failed, Some(&e.to_string()));
                continue;
            }
        };

        if !action.changes_anything() {
            if let LinkAction::Conflict(conflict) = &action {
                let msg = conflict.to_string();
                ctx.log.error(&msg);
                ctx.log.record_entry(&name, EntryStatus::Failed, Some(&msg));
            } else {
                ctx.log.debug(&format!("{name} already linked"));
                ctx.log
                    .record_entry(&name, EntryStatus::Skipped, Some("already linked"));
            }
            continue;
        }

        if ctx.dry_run {
            let msg = format!("would {}", action.describe(&file));
            ctx.log.dry_run(&msg);
            ctx.log.record_entry(&name, EntryStatus::DryRun, Some(&msg));
            continue;
        }

        match action.apply(&file, ctx.fs_ops.as_ref()) {
            Ok(()) => {
                ctx.log.info(&format!(
                    "{} → {}",
                    file.source.display(),
                    file.destination.display()
                ));
                let detail = (action == LinkAction::BackupAndCreate)
                    .then(|| format!("backed up to {}", file.backup().display()));
                ctx.log
                    .record_entry(&name, EntryStatus::Ok, detail.as_deref());
            }
            Err(e) => {
                ctx.log.error(&e.to_string());
                ctx.log
                    .record_entry(&name, EntryStatus::Failed, Some(&e.to_string()));
            }
        }
    }
}
