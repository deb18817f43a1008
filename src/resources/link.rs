//! Linking a destination to its source.
use std::path::PathBuf;

use thiserror::Error;

use super::{FileState, Inspection, ManagedFile, ensure_parent_dir};
use crate::error::FilesystemError;
use crate::operations::FileSystemOps;

/// A destination that `link` refuses to touch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkConflict {
    /// The destination is already a symlink, but not to our source.
    #[error("{} is a symlink to {}", .destination.display(), .current.display())]
    LinkedElsewhere {
        /// Destination path.
        destination: PathBuf,
        /// Where the existing link points.
        current: PathBuf,
    },

    /// The destination is a plain file and a backup is already in the way.
    #[error("{} exists and backup {} is already taken", .destination.display(), .backup.display())]
    BackupExists {
        /// Destination path.
        destination: PathBuf,
        /// Existing backup path.
        backup: PathBuf,
    },
}

/// What `link` will do for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Nothing there yet: create the symlink.
    Create,
    /// A plain file or directory is there: move it to the backup, then link.
    BackupAndCreate,
    /// Already a symlink to the source.
    AlreadyLinked,
    /// Left alone; see the conflict.
    Conflict(LinkConflict),
}

impl LinkAction {
    /// Inspect the destination and decide.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::Inspect`] if the destination or its backup
    /// cannot be examined.
    pub fn plan(file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<Self, FilesystemError> {
        Ok(Self::for_inspection(file, &file.inspect(fs)?))
    }

    /// Decide from an existing inspection.
    #[must_use]
    pub fn for_inspection(file: &ManagedFile, inspection: &Inspection) -> Self {
        match &inspection.state {
            FileState::Absent => Self::Create,
            FileState::Symlink { target } if file.points_to_source(target) => Self::AlreadyLinked,
            FileState::Symlink { target } => Self::Conflict(LinkConflict::LinkedElsewhere {
                destination: file.destination.clone(),
                current: target.clone(),
            }),
            FileState::Plain if inspection.has_backup => {
                Self::Conflict(LinkConflict::BackupExists {
                    destination: file.destination.clone(),
                    backup: file.backup(),
                })
            }
            FileState::Plain => Self::BackupAndCreate,
        }
    }

    /// Whether applying this action changes the filesystem.
    #[must_use]
    pub const fn changes_anything(&self) -> bool {
        matches!(self, Self::Create | Self::BackupAndCreate)
    }

    /// One-line description of the change, used for dry-run output.
    #[must_use]
    pub fn describe(&self, file: &ManagedFile) -> String {
        let link = format!(
            "link {} -> {}",
            file.destination.display(),
            file.source.display()
        );
        match self {
            Self::Create => link,
            Self::BackupAndCreate => format!(
                "back up {} to {}, then {link}",
                file.destination.display(),
                file.backup().display()
            ),
            Self::AlreadyLinked => format!("{} already linked", file.destination.display()),
            Self::Conflict(conflict) => conflict.to_string(),
        }
    }

    /// Perform the action.  `AlreadyLinked` and conflicts are no-ops.
    ///
    /// If the symlink cannot be created after the destination was moved to
    /// its backup, the backup is moved back.  When that also fails the error
    /// is [`FilesystemError::Stranded`], naming where the content is.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesystemError`] naming the step that failed.
    pub fn apply(&self, file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<(), FilesystemError> {
        match self {
            Self::Create => {
                ensure_parent_dir(fs, &file.destination)?;
                create_link(file, fs)
            }
            Self::BackupAndCreate => {
                let backup = file.backup();
                fs.rename(&file.destination, &backup)
                    .map_err(|source| FilesystemError::Backup {
                        path: file.destination.clone(),
                        backup: backup.clone(),
                        source,
                    })?;
                create_link(file, fs).or_else(|err| {
                    match fs.rename(&backup, &file.destination) {
                        Ok(()) => Err(err),
                        Err(source) => Err(FilesystemError::Stranded {
                            link: Box::new(err),
                            backup,
                            source,
                        }),
                    }
                })
            }
            Self::AlreadyLinked | Self::Conflict(_) => Ok(()),
        }
    }
}

fn create_link(file: &ManagedFile, fs: &dyn FileSystemOps) -> Result<(), FilesystemError> {
    fs.symlink(&file.source, &file.destination)
        .map_err(|source| FilesystemError::Symlink {
            link: file.destination.clone(),
            target: file.source.clone(),
            source,
        })
}
