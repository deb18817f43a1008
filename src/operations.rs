//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that orchestrators can be
//! exercised against injected failures without special filesystem setups.
//! Production code uses [`SystemFileSystemOps`].

use std::io;
use std::path::{Path, PathBuf};

/// What lives at a path, inspected without following a final symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, directory, or other non-symlink entry.
    Plain,
    /// A symbolic link pointing at the contained target.
    Symlink(PathBuf),
}

/// Abstraction over the filesystem calls used by the orchestrators.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Inspect `path` without following a final symlink.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but cannot be inspected.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Returns `true` if `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// Rename `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove the symlink (or file) at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing at `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read the whole file at `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                std::fs::read_link(path).map(|target| Some(EntryKind::Symlink(target)))
            }
            Ok(_) => Ok(Some(EntryKind::Plain)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }
        #[cfg(not(unix))]
        {
            let _ = (target, link);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "symlinks are only supported on unix",
            ))
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// [`FileSystemOps`] wrapper that fails selected operations on one path and
/// delegates everything else to [`SystemFileSystemOps`].
///
/// Lets tests check that a failure on one mapping entry is reported without
/// aborting the remaining entries.
#[cfg(test)]
#[derive(Debug)]
pub struct FailingFileSystemOps {
    fail_path: PathBuf,
    fail_symlink: bool,
    fail_rename: bool,
    fail_rename_into: bool,
    fail_remove: bool,
}

#[cfg(test)]
impl FailingFileSystemOps {
    /// Fail no operation yet; use the `failing_*` builders to choose.
    #[must_use]
    pub fn on(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_path: path.into(),
            fail_symlink: false,
            fail_rename: false,
            fail_rename_into: false,
            fail_remove: false,
        }
    }

    /// Fail `symlink` when the link path matches.
    #[must_use]
    pub const fn failing_symlink(mut self) -> Self {
        self.fail_symlink = true;
        self
    }

    /// Fail `rename` when either side matches.
    #[must_use]
    pub const fn failing_rename(mut self) -> Self {
        self.fail_rename = true;
        self
    }

    /// Fail `rename` only when moving something onto the path.
    #[must_use]
    pub const fn failing_rename_into(mut self) -> Self {
        self.fail_rename_into = true;
        self
    }

    /// Fail `remove_link` when the path matches.
    #[must_use]
    pub const fn failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    fn injected() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "injected failure")
    }
}

#[cfg(test)]
impl FileSystemOps for FailingFileSystemOps {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        SystemFileSystemOps.entry_kind(path)
    }

    fn exists(&self, path: &Path) -> bool {
        SystemFileSystemOps.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        SystemFileSystemOps.is_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let onto = to == self.fail_path;
        if (self.fail_rename && (from == self.fail_path || onto)) || (self.fail_rename_into && onto) {
            return Err(Self::injected());
        }
        SystemFileSystemOps.rename(from, to)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        if self.fail_remove && path == self.fail_path {
            return Err(Self::injected());
        }
        SystemFileSystemOps.remove_link(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        if self.fail_symlink && link == self.fail_path {
            return Err(Self::injected());
        }
        SystemFileSystemOps.symlink(target, link)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        SystemFileSystemOps.create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        SystemFileSystemOps.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        SystemFileSystemOps.write(path, contents)
    }
}
