pub mod link;
pub mod sync;
pub mod unlink;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::context::Context;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::Platform;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded file mapping.
    pub config: Config,
    /// Context wired to the real system.
    pub ctx: Context,
}

impl CommandSetup {
    /// Resolve the repository root, detect the platform, and load
    /// `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be determined or the configuration
    /// cannot be loaded.
    pub fn init(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let root = resolve_root(global)?;
        let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
        let platform = Platform::detect(executor.as_ref());
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("host: {}", platform.hostname));

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        if config.is_empty() {
            let file = root.join(crate::config::CONFIG_FILE);
            log.warn(&format!("{} maps no files", file.display()));
        } else {
            log.info(&format!("{} mapped files", config.files.len()));
        }

        let ctx = Context::new(
            root,
            Arc::new(platform),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            executor,
        );
        Ok(Self { config, ctx })
    }
}

/// Resolve the repository root from `--root` or the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(match &global.root {
        Some(root) => crate::paths::resolve(&cwd, root),
        None => cwd,
    })
}

/// Print the summary and bail if any entry failed.
///
/// # Errors
///
/// Returns an error if one or more entries recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    match log.failure_count() {
        0 => Ok(()),
        1 => anyhow::bail!("1 entry failed"),
        n => anyhow::bail!("{n} entries failed"),
    }
}
