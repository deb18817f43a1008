//! Core logging types: entry records, status, and the [`Log`] trait.

/// Per-entry result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Human-readable entry name (usually the destination path).
    pub name: String,
    /// Final status of the entry.
    pub status: EntryStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// The entry was changed successfully.
    Ok,
    /// Nothing was done for this entry (already linked, missing, declined, …).
    Skipped,
    /// Dry-run mode; the planned change was only reported.
    DryRun,
    /// The entry could not be processed.
    Failed,
}

/// Abstraction over logging backends.
///
/// Orchestrators log through this trait so tests can supply a logger that
/// writes to an isolated file.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (shown on the console only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an entry result for the summary.
    fn record_entry(&self, name: &str, status: EntryStatus, message: Option<&str>);
}
