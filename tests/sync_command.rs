#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `sync` command.
//!
//! Destinations here are plain copies, as on a machine where the files were
//! copied rather than linked. Git is replaced by [`FakeVcs`], which records
//! the operations sync asks for.

mod common;

use std::sync::Arc;

use common::*;
use dotdeck::commands::sync::{SyncMode, SyncOptions, sync_all};
use dotdeck::logging::EntryStatus;

const fn full(force: bool) -> SyncOptions {
    SyncOptions {
        force,
        mode: SyncMode::Full,
    }
}

#[test]
fn edited_copy_is_brought_back_and_pushed() {
    let t = TestContextBuilder::new()
        .with_file("bashrc", "old", "~/.bashrc")
        .with_file("vimrc", "same", "~/.vimrc")
        .with_home_file(".bashrc", "new")
        .with_home_file(".vimrc", "same")
        .build();
    let log = quiet_logger();
    let vcs = Arc::new(
        FakeVcs::default()
            .with_dirty(t.repo_path("bashrc"))
            .with_ahead(1),
    );

    sync_all(&t.context(&log, false, false, &vcs), &t.load_config(), full(false)).unwrap();

    assert_eq!(std::fs::read_to_string(t.repo_path("bashrc")).unwrap(), "new");
    let calls = vcs.calls();
    assert_eq!(calls[0], format!("stage {}", t.repo_path("bashrc").display()));
    assert!(calls[1].starts_with("commit Sync from integration at "));
    assert!(calls[1].ends_with(&format!(" -- {}", t.repo_path("bashrc").display())));
    assert_eq!(calls[2..], ["pull --ff-only", "fetch", "push"]);
    assert_eq!(statuses(&log), [EntryStatus::Ok, EntryStatus::Skipped]);
}

#[test]
fn clean_source_needs_force() {
    let t = TestContextBuilder::new()
        .with_file("gitconfig", "repo", "~/.gitconfig")
        .with_home_file(".gitconfig", "machine")
        .build();
    let config = t.load_config();

    let vcs = Arc::new(FakeVcs::default());
    sync_all(&t.context(&quiet_logger(), false, false, &vcs), &config, full(false)).unwrap();
    assert!(vcs.calls().is_empty());
    assert_eq!(
        std::fs::read_to_string(t.repo_path("gitconfig")).unwrap(),
        "repo"
    );

    let forced = Arc::new(FakeVcs::default());
    sync_all(&t.context(&quiet_logger(), false, false, &forced), &config, full(true)).unwrap();
    assert_eq!(
        std::fs::read_to_string(t.repo_path("gitconfig")).unwrap(),
        "machine"
    );
    assert_eq!(forced.calls().last().map(String::as_str), Some("fetch"));
}

#[test]
fn pull_mode_copies_nothing() {
    let t = TestContextBuilder::new()
        .with_file("zshrc", "repo", "~/.zshrc")
        .with_home_file(".zshrc", "machine")
        .build();
    let log = quiet_logger();
    let vcs = Arc::new(FakeVcs::default().with_dirty(t.repo_path("zshrc")));
    let opts = SyncOptions {
        force: false,
        mode: SyncMode::PullOnly,
    };

    sync_all(&t.context(&log, false, false, &vcs), &t.load_config(), opts).unwrap();

    assert_eq!(std::fs::read_to_string(t.repo_path("zshrc")).unwrap(), "repo");
    assert_eq!(vcs.calls(), ["pull --ff-only"]);
    assert!(log.entries().is_empty());
}

#[test]
fn dry_run_writes_nothing_and_calls_no_git() {
    let t = TestContextBuilder::new()
        .with_file("tmux.conf", "repo", "~/.tmux.conf")
        .with_home_file(".tmux.conf", "machine")
        .build();
    let log = quiet_logger();
    let vcs = Arc::new(FakeVcs::default().with_dirty(t.repo_path("tmux.conf")));

    sync_all(&t.context(&log, true, false, &vcs), &t.load_config(), full(false)).unwrap();

    assert_eq!(
        std::fs::read_to_string(t.repo_path("tmux.conf")).unwrap(),
        "repo"
    );
    assert!(vcs.calls().is_empty());
    assert_eq!(statuses(&log), [EntryStatus::DryRun]);
}

#[test]
fn linked_destinations_are_unchanged() {
    let t = TestContextBuilder::new()
        .with_file("inputrc", "repo", "~/.inputrc")
        .build();
    std::os::unix::fs::symlink(t.repo_path("inputrc"), t.home_path(".inputrc")).unwrap();
    let log = quiet_logger();
    let vcs = Arc::new(FakeVcs::default().with_dirty(t.repo_path("inputrc")));

    sync_all(&t.context(&log, false, false, &vcs), &t.load_config(), full(false)).unwrap();

    assert!(vcs.calls().is_empty());
    assert_eq!(log.entries()[0].message.as_deref(), Some("unchanged"));
}
