//! Managed files and the plan + apply primitives that move them between
//! states.
//!
//! A destination is always in exactly one [`FileState`], derived fresh from
//! the filesystem on every inspection and never stored.  Each command builds
//! a plan from an [`Inspection`] and then applies it; dry-run stops after the
//! plan.
pub mod link;
pub mod sync;
pub mod unlink;

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;
use crate::operations::{EntryKind, FileSystemOps};
use crate::paths;

/// Suffix appended to a destination to form its backup path.
pub const BACKUP_SUFFIX: &str = ".deckbak";

/// Backup path for `destination`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotdeck::resources::backup_path;
///
/// assert_eq!(
///     backup_path(Path::new("/home/alice/.zshrc")),
///     PathBuf::from("/home/alice/.zshrc.deckbak")
/// );
/// ```
#[must_use]
pub fn backup_path(destination: &Path) -> PathBuf {
    paths::with_suffix(destination, BACKUP_SUFFIX)
}

/// What currently occupies a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    /// Nothing exists at the destination.
    Absent,
    /// A regular file or directory that is not a symlink.
    Plain,
    /// A symlink, with the target exactly as stored in the link.
    Symlink {
        /// Raw link target.
        target: PathBuf,
    },
}

/// Snapshot of a destination and its backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// State of the destination itself.
    pub state: FileState,
    /// Whether `destination.deckbak` exists (a dangling symlink counts).
    pub has_backup: bool,
}

/// One mapping entry with both sides resolved to absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    /// File inside the repository.
    pub source: PathBuf,
    /// Location on this machine.
    pub destination: PathBuf,
}

impl ManagedFile {
    /// Pair a resolved source with its resolved destination.
    #[must_use]
    pub const fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Backup path of the destination.
    #[must_use]
    pub fn backup(&self) -> PathBuf {
        backup_path(&self.destination)
    }

    /// Inspect the destination and its backup without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::Inspect`] if either path exists but cannot
    /// be examined.
    pub fn inspect(&self, fs: &dyn FileSystemOps) -> Result<Inspection, FilesystemError> {
        let state = match inspect_path(fs, &self.destination)? {
            None => FileState::Absent,
            Some(EntryKind::Plain) => FileState::Plain,
            Some(EntryKind::Symlink(target)) => FileState::Symlink { target },
        };
        let has_backup = inspect_path(fs, &self.backup())?.is_some();
        Ok(Inspection { state, has_backup })
    }

    /// Whether a symlink stored at the destination with `target` resolves to
    /// the source.  Relative targets are taken relative to the link's
    /// directory.
    #[must_use]
    pub fn points_to_source(&self, target: &Path) -> bool {
        let base = self.destination.parent().unwrap_or_else(|| Path::new("/"));
        paths::resolve(base, target) == paths::clean(&self.source)
    }
}

fn inspect_path(fs: &dyn FileSystemOps, path: &Path) -> Result<Option<EntryKind>, FilesystemError> {
    fs.entry_kind(path).map_err(|source| FilesystemError::Inspect {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the parent directory of `path` if it is missing.
///
/// # Errors
///
/// Returns [`FilesystemError::CreateParent`] if the directory cannot be
/// created.
pub fn ensure_parent_dir(fs: &dyn FileSystemOps, path: &Path) -> Result<(), FilesystemError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !fs.exists(parent) => fs
            .create_dir_all(parent)
            .map_err(|source| FilesystemError::CreateParent {
                path: parent.to_path_buf(),
                source,
            }),
        _ => Ok(()),
    }
}
