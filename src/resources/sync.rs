//! Copying local edits of a destination back into the repository.
use super::ManagedFile;
use crate::error::{DeckError, FilesystemError};
use crate::operations::FileSystemOps;
use crate::vcs::VersionControl;

/// What `sync` will do for one mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// The destination does not exist on this machine.
    DestinationMissing,
    /// The destination is a directory; only files are synced.
    Directory,
    /// Destination and source have identical content.
    Unchanged,
    /// Content differs but the source has no uncommitted changes and
    /// `--force` was not given.
    Clean,
    /// Copy the destination over the source.
    CopyBack,
}

impl SyncAction {
    /// Decide what to do for `file`.
    ///
    /// The dirty check runs before the content comparison.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::VersionControl`] if the dirty check fails and
    /// [`DeckError::Filesystem`] if either file cannot be read.
    pub fn plan(
        file: &ManagedFile,
        fs: &dyn FileSystemOps,
        vcs: &dyn VersionControl,
        force: bool,
    ) -> Result<Self, DeckError> {
        if !fs.exists(&file.destination) {
            return Ok(Self::DestinationMissing);
        }
        if fs.is_dir(&file.destination) {
            return Ok(Self::Directory);
        }

        let dirty = vcs.is_dirty(&file.source)?;
        let differ = read(fs, &file.destination)? != read(fs, &file.source)?;

        Ok(match (differ, dirty || force) {
            (false, _) => Self::Unchanged,
            (true, false) => Self::Clean,
            (true, true) => Self::CopyBack,
        })
    }

    /// Short reason shown for entries that are not copied.
    #[must_use]
    pub const fn skip_reason(self) -> Option<&'static str> {
        match self {
            Self::DestinationMissing => Some("destination missing"),
            Self::Directory => Some("directory"),
            Self::Unchanged => Some("unchanged"),
            Self::Clean => Some("clean in repository, use --force"),
            Self::CopyBack => None,
        }
    }
}

/// Overwrite the source with the destination's bytes.
///
/// # Errors
///
/// Returns [`FilesystemError::Read`] or [`FilesystemError::Write`].
pub fn copy_back(file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<(), FilesystemError> {
    let bytes = read(fs, &file.destination)?;
    fs.write(&file.source, &bytes)
        .map_err(|source| FilesystemError::Write {
            path: file.source.clone(),
            source,
        })
}

fn read(fs: &dyn FileSystemOps, path: &std::path::Path) -> Result<Vec<u8>, FilesystemError> {
    fs.read(path).map_err(|source| FilesystemError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::SystemFileSystemOps;
    use crate::vcs::MockVersionControl;

    struct Fixture {
        _dir: tempfile::TempDir,
        file: ManagedFile,
    }

    fn fixture(source: &str, destination: Option<&str>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let file = ManagedFile::new(dir.path().join("tmux.conf"), dir.path().join(".tmux.conf"));
        std::fs::write(&file.source, source).unwrap();
        if let Some(content) = destination {
            std::fs::write(&file.destination, content).unwrap();
        }
        Fixture { _dir: dir, file }
    }

    fn vcs(dirty: bool) -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_dirty().returning(move |_| Ok(dirty));
        vcs
    }

    #[test]
    fn missing_destination_skips_vcs() {
        let fx = fixture("a", None);
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_dirty().never();
        assert_eq!(
            SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs, false).unwrap(),
            SyncAction::DestinationMissing
        );
    }

    #[test]
    fn directory_destination_is_skipped() {
        let fx = fixture("a", None);
        std::fs::create_dir(&fx.file.destination).unwrap();
        let mut vcs = MockVersionControl::new();
        vcs.expect_is_dirty().never();
        assert_eq!(
            SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs, false).unwrap(),
            SyncAction::Directory
        );
    }

    #[test]
    fn identical_content_is_unchanged() {
        let fx = fixture("same", Some("same"));
        assert_eq!(
            SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs(true), true).unwrap(),
            SyncAction::Unchanged
        );
    }

    #[test]
    fn differing_clean_file_needs_force() {
        let fx = fixture("repo", Some("local"));
        assert_eq!(
            SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs(false), false).unwrap(),
            SyncAction::Clean
        );
        assert_eq!(
            SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs(false), true).unwrap(),
            SyncAction::CopyBack
        );
    }

    #[test]
    fn differing_dirty_file_is_copied() {
        let fx = fixture("repo", Some("local"));
        let action = SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs(true), false).unwrap();
        assert_eq!(action, SyncAction::CopyBack);
        assert_eq!(action.skip_reason(), None);
        copy_back(&fx.file, &SystemFileSystemOps).unwrap();
        assert_eq!(std::fs::read_to_string(&fx.file.source).unwrap(), "local");
    }

    #[test]
    fn unreadable_source_is_an_error() {
        let fx = fixture("repo", Some("local"));
        std::fs::remove_file(&fx.file.source).unwrap();
        let err = SyncAction::plan(&fx.file, &SystemFileSystemOps, &vcs(true), false).unwrap_err();
        assert!(matches!(
            err,
            DeckError::Filesystem(FilesystemError::Read { .. })
        ));
    }
}
