//! Path expansion and resolution for mapping entries.
use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` or `~/` to `home`.
///
/// Any other input is returned unchanged.  When `home` is `None` the literal
/// input is returned as well; an unresolvable home directory is not an error.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotdeck::paths::expand_home;
///
/// let home = Path::new("/home/alice");
/// assert_eq!(expand_home("~/.zshrc", Some(home)), PathBuf::from("/home/alice/.zshrc"));
/// assert_eq!(expand_home("/etc/hosts", Some(home)), PathBuf::from("/etc/hosts"));
/// assert_eq!(expand_home("~/.zshrc", None), PathBuf::from("~/.zshrc"));
/// ```
#[must_use]
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (_, Some(home)) => path
            .strip_prefix("~/")
            .map_or_else(|| PathBuf::from(path), |rest| home.join(rest)),
        (_, None) => PathBuf::from(path),
    }
}

/// Resolve `path` to an absolute, lexically cleaned path, treating relative
/// paths as relative to `base`.
#[must_use]
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&base.join(path))
    }
}

/// Remove `.` components and fold `..` into the preceding component without
/// touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` in a relative path is
/// preserved.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Append `suffix` to the final component of `path` (`a/b` → `a/b.suffix`).
#[must_use]
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
