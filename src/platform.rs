use std::path::{Path, PathBuf};

use crate::exec::Executor;

/// Kernel-provided hostname on Linux.
const PROC_HOSTNAME: &str = "/proc/sys/kernel/hostname";

/// Hostname used when nothing else can be determined.
const UNKNOWN_HOST: &str = "unknown";

/// Facts about the machine the command runs on.
#[derive(Debug, Clone)]
pub struct Platform {
    /// The user's home directory, if it could be determined.
    pub home: Option<PathBuf>,
    /// Short hostname, used in sync commit messages.
    pub hostname: String,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        Self {
            home: dirs::home_dir(),
            hostname: detect_hostname(Path::new(PROC_HOSTNAME), executor),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub fn new(home: Option<PathBuf>, hostname: impl Into<String>) -> Self {
        Self {
            home,
            hostname: hostname.into(),
        }
    }
}

/// Read the hostname from `proc_file`, falling back to the `hostname`
/// program and finally to `"unknown"`.
fn detect_hostname(proc_file: &Path, executor: &dyn Executor) -> String {
    if let Some(name) = std::fs::read_to_string(proc_file)
        .ok()
        .and_then(|s| non_empty(&s))
    {
        return name;
    }

    executor
        .run_in(Path::new("/"), "hostname", &[])
        .ok()
        .and_then(|r| non_empty(&r.stdout))
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
