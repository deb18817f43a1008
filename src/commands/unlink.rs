use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, UnlinkOpts};
use crate::config::Config;
use crate::context::Context;
use crate::error::DeckError;
use crate::logging::{EntryStatus, Logger};
use crate::prompt::PresetConfirm;
use crate::resources::ManagedFile;
use crate::resources::unlink::UnlinkAction;

/// Run the unlink command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any entry failed.
pub fn run(global: &GlobalOpts, opts: &UnlinkOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let ctx = if opts.yes {
        setup.ctx.with_confirm(Arc::new(PresetConfirm(true)))
    } else {
        setup.ctx
    };
    unlink_all(&ctx, &setup.config);
    super::finish(log)
}

/// Unlink every mapping entry, recording one result per entry.
///
/// Plain files are never touched.  Errors are recorded and the remaining
/// entries are still processed.
pub fn unlink_all(ctx: &Context, config: &Config) {
    ctx.log.stage("Unlinking files");

    for entry in &config.files {
        let file = ctx.managed_file(entry);
        let name = file.destination.display().to_string();
        ctx.log.debug(&format!("evaluating {name}"));

        match unlink_one(ctx, &file) {
            Ok((status, msg)) => ctx.log.record_entry(&name, status, Some(&msg)),
            Err(e @ DeckError::UserAborted { .. }) => {
                ctx.log.info(&format!("skipping {name}"));
                ctx.log
                    .record_entry(&name, EntryStatus::Skipped, Some(&e.to_string()));
            }
            Err(e) => {
                ctx.log.error(&e.to_string());
                ctx.log
                    .record_entry(&name, EntryStatus::Failed, Some(&e.to_string()));
            }
        }
    }
}

fn unlink_one(ctx: &Context, file: &ManagedFile) -> Result<(EntryStatus, String), DeckError> {
    let action = UnlinkAction::plan(file, ctx.fs_ops.as_ref())?;
    let dest = file.destination.display();

    match action {
        UnlinkAction::Missing => {
            ctx.log.warn(&format!("{dest} missing, skipping"));
            return Ok((EntryStatus::Skipped, "missing".to_string()));
        }
        UnlinkAction::NotASymlink => {
            ctx.log.warn(&format!("{dest} is not a symlink, skipping"));
            return Ok((EntryStatus::Skipped, "not a symlink".to_string()));
        }
        UnlinkAction::Restore { .. } | UnlinkAction::RemoveOnly { .. } => {}
    }

    if let Some(target) = action.foreign_target(file) {
        ctx.log.warn(&format!(
            "{dest} points to {}, not {}; removing it anyway",
            target.display(),
            file.source.display()
        ));
    }

    if ctx.dry_run {
        let msg = format!("would {}", action.describe(file));
        ctx.log.dry_run(&msg);
        return Ok((EntryStatus::DryRun, msg));
    }

    if action.needs_confirmation() {
        let question = format!("No backup found for {dest}. Delete symlink?");
        let confirmed = ctx
            .confirm
            .confirm(&question)
            .map_err(|source| DeckError::Prompt { source })?;
        if !confirmed {
            return Err(DeckError::UserAborted {
                path: file.destination.clone(),
            });
        }
    }

    action.apply(file, ctx.fs_ops.as_ref())?;

    let msg = match action {
        UnlinkAction::Restore { .. } => "restored backup",
        _ => "removed symlink (no backup to restore)",
    };
    ctx.log.info(&format!("{dest}: {msg}"));
    Ok((EntryStatus::Ok, msg.to_string()))
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::Fixture;
    use crate::config::MappingEntry;
    use crate::logging::isolated_logger;
    use crate::operations::FailingFileSystemOps;
    use crate::prompt::Confirm;
    use std::sync::Mutex;

    /// Records every question and answers with a fixed value.
    #[derive(Debug, Default)]
    struct ScriptedConfirm {
        answer: bool,
        asked: Mutex<Vec<String>>,
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&self, question: &str) -> std::io::Result<bool> {
            self.asked.lock().unwrap().push(question.to_string());
            Ok(self.answer)
        }
    }

    fn linked(fx: &Fixture, name: &str, backup: Option<&str>) -> MappingEntry {
        let entry = fx.source(name, "repo");
        std::os::unix::fs::symlink(fx.root.join(name), fx.dest(name)).unwrap();
        if let Some(content) = backup {
            std::fs::write(fx.home.join(format!(".{name}.deckbak")), content).unwrap();
        }
        entry
    }

    fn context(
        fx: &Fixture,
        log: &Arc<Logger>,
        dry_run: bool,
        confirm: Arc<dyn Confirm>,
    ) -> Context {
        fx.context(Arc::clone(log), dry_run).with_confirm(confirm)
    }

    #[test]
    fn restores_backups_without_asking() {
        let fx = Fixture::new();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let confirm = Arc::new(ScriptedConfirm::default());
        let config = fx.config(vec![linked(&fx, "zshrc", Some("original"))]);

        let shared = Arc::clone(&confirm) as Arc<dyn Confirm>;
        unlink_all(&context(&fx, &log, false, shared), &config);

        assert_eq!(std::fs::read_to_string(fx.dest("zshrc")).unwrap(), "original");
        assert!(confirm.asked.lock().unwrap().is_empty());
        assert_eq!(log.entries()[0].message.as_deref(), Some("restored backup"));
    }

    #[test]
    fn declined_confirmation_keeps_the_link() {
        let fx = Fixture::new();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let confirm = Arc::new(ScriptedConfirm::default());
        let config = fx.config(vec![linked(&fx, "vimrc", None)]);

        let shared = Arc::clone(&confirm) as Arc<dyn Confirm>;
        unlink_all(&context(&fx, &log, false, shared), &config);

        assert!(
            std::fs::symlink_metadata(fx.dest("vimrc"))
                .unwrap()
                .file_type()
                .is_symlink()
        );
        let asked = confirm.asked.lock().unwrap();
        assert_eq!(asked.len(), 1);
        assert!(asked[0].starts_with("No backup found for"));
        let entry = &log.entries()[0];
        assert_eq!(entry.status, EntryStatus::Skipped);
        assert!(entry.message.as_deref().unwrap().starts_with("aborted by user"));
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn accepted_confirmation_removes_the_link() {
        let fx = Fixture::new();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let config = fx.config(vec![linked(&fx, "vimrc", None)]);

        unlink_all(
            &context(&fx, &log, false, Arc::new(PresetConfirm(true))),
            &config,
        );

        assert!(fx.dest("vimrc").symlink_metadata().is_err());
        assert_eq!(log.entries()[0].status, EntryStatus::Ok);
    }

    #[test]
    fn plain_files_and_missing_destinations_are_skipped() {
        let fx = Fixture::new();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let plain = fx.source("bashrc", "repo");
        std::fs::write(fx.dest("bashrc"), "hand written").unwrap();
        let config = fx.config(vec![plain, fx.source("inputrc", "repo")]);

        unlink_all(
            &context(&fx, &log, false, Arc::new(PresetConfirm(true))),
            &config,
        );

        assert_eq!(
            std::fs::read_to_string(fx.dest("bashrc")).unwrap(),
            "hand written"
        );
        let messages: Vec<String> = log
            .entries()
            .into_iter()
            .map(|e| e.message.unwrap_or_default())
            .collect();
        assert_eq!(messages, ["not a symlink", "missing"]);
    }

    #[test]
    fn dry_run_neither_prompts_nor_mutates() {
        let fx = Fixture::new();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let confirm = Arc::new(ScriptedConfirm::default());
        let config = fx.config(vec![
            linked(&fx, "gitconfig", Some("mine")),
            linked(&fx, "tmux.conf", None),
        ]);

        let shared = Arc::clone(&confirm) as Arc<dyn Confirm>;
        unlink_all(&context(&fx, &log, true, shared), &config);

        assert!(confirm.asked.lock().unwrap().is_empty());
        assert!(fx.home.join(".gitconfig.deckbak").exists());
        assert!(fx.dest("tmux.conf").symlink_metadata().is_ok());
        assert!(
            log.entries()
                .iter()
                .all(|e| e.status == EntryStatus::DryRun)
        );
    }

    #[test]
    fn errors_do_not_stop_remaining_entries() {
        let fx = Fixture::new();
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let config = fx.config(vec![
            linked(&fx, "a", Some("backup a")),
            linked(&fx, "b", Some("backup b")),
        ]);
        let ctx = context(&fx, &log, false, Arc::new(PresetConfirm(true)))
            .with_fs_ops(Arc::new(FailingFileSystemOps::on(fx.dest("a")).failing_remove()));

        unlink_all(&ctx, &config);

        assert_eq!(log.failure_count(), 1);
        assert_eq!(std::fs::read_to_string(fx.dest("b")).unwrap(), "backup b");
    }

    #[test]
    fn foreign_link_is_removed_with_warning() {
        let fx = Fixture::new();
        let (log, tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let entry = fx.source("npmrc", "repo");
        std::os::unix::fs::symlink("/etc/hostname", fx.dest("npmrc")).unwrap();
        std::fs::write(fx.home.join(".npmrc.deckbak"), "mine").unwrap();

        unlink_all(
            &context(&fx, &log, false, Arc::new(PresetConfirm(false))),
            &fx.config(vec![entry]),
        );

        assert_eq!(std::fs::read_to_string(fx.dest("npmrc")).unwrap(), "mine");
        let logged = std::fs::read_to_string(tmp.path().join("test.log")).unwrap();
        assert!(logged.contains("removing it anyway"));
    }
}
