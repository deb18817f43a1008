//! Removing a managed symlink and restoring what it displaced.
use std::path::{Path, PathBuf};

use super::{FileState, Inspection, ManagedFile};
use crate::error::FilesystemError;
use crate::operations::FileSystemOps;

/// What `unlink` will do for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlinkAction {
    /// Nothing exists at the destination.
    Missing,
    /// The destination is a plain file or directory and is never touched.
    NotASymlink,
    /// Remove the symlink and move the backup back into place.
    Restore {
        /// Where the symlink points.
        target: PathBuf,
    },
    /// Remove the symlink; there is no backup to restore.
    RemoveOnly {
        /// Where the symlink points.
        target: PathBuf,
    },
}

impl UnlinkAction {
    /// Inspect the destination and decide.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::Inspect`] if the destination or its backup
    /// cannot be examined.
    pub fn plan(file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<Self, FilesystemError> {
        Ok(Self::for_inspection(&file.inspect(fs)?))
    }

    /// Decide from an existing inspection.
    #[must_use]
    pub fn for_inspection(inspection: &Inspection) -> Self {
        match &inspection.state {
            FileState::Absent => Self::Missing,
            FileState::Plain => Self::NotASymlink,
            FileState::Symlink { target } if inspection.has_backup => Self::Restore {
                target: target.clone(),
            },
            FileState::Symlink { target } => Self::RemoveOnly {
                target: target.clone(),
            },
        }
    }

    /// Whether the user must confirm before this is applied.
    #[must_use]
    pub const fn needs_confirmation(&self) -> bool {
        matches!(self, Self::RemoveOnly { .. })
    }

    /// The link target when it does not resolve to the configured source.
    #[must_use]
    pub fn foreign_target(&self, file: &ManagedFile) -> Option<&Path> {
        match self {
            Self::Restore { target } | Self::RemoveOnly { target }
                if !file.points_to_source(target) =>
            {
                Some(target.as_path())
            }
            _ => None,
        }
    }

    /// One-line description of the change, used for dry-run output.
    #[must_use]
    pub fn describe(&self, file: &ManagedFile) -> String {
        let dest = file.destination.display();
        match self {
            Self::Missing => format!("{dest} missing"),
            Self::NotASymlink => format!("{dest} is not a symlink"),
            Self::Restore { .. } => format!(
                "remove symlink {dest} and restore {}",
                file.backup().display()
            ),
            Self::RemoveOnly { .. } => format!("remove symlink {dest} (no backup to restore)"),
        }
    }

    /// Perform the action.  `Missing` and `NotASymlink` are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::Remove`] if the symlink cannot be removed
    /// and [`FilesystemError::Restore`] if the backup cannot be moved back.
    pub fn apply(&self, file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<(), FilesystemError> {
        match self {
            Self::Missing | Self::NotASymlink => Ok(()),
            Self::RemoveOnly { .. } => remove_link(file, fs),
            Self::Restore { .. } => {
                remove_link(file, fs)?;
                let backup = file.backup();
                fs.rename(&backup, &file.destination)
                    .map_err(|source| FilesystemError::Restore {
                        backup,
                        path: file.destination.clone(),
                        source,
                    })
            }
        }
    }
}

fn remove_link(file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<(), FilesystemError> {
    fs.remove_link(&file.destination)
        .map_err(|source| FilesystemError::Remove {
            path: file.destination.clone(),
            source,
        })
}
