//! Loading the file mapping from `config.toml`.
pub mod toml_loader;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Name of the configuration file in the repository root.
pub const CONFIG_FILE: &str = "config.toml";

/// One source → destination pair from the `[files]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Path of the tracked file, relative to the repository root or absolute.
    pub source: String,
    /// Where the file is expected on this machine; may start with `~/`.
    pub destination: String,
}

/// Raw shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    files: BTreeMap<String, String>,
}

/// All loaded configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root the config was loaded from.
    pub root: PathBuf,
    /// File mapping, ordered by source path.
    pub files: Vec<MappingEntry>,
}

impl Config {
    /// Load `config.toml` from `root`.
    ///
    /// A document without a `[files]` table yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file is missing or unreadable and
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let raw: ConfigFile = toml_loader::load_toml(&root.join(CONFIG_FILE))?;
        Ok(Self {
            root: root.to_path_buf(),
            files: raw
                .files
                .into_iter()
                .map(|(source, destination)| MappingEntry {
                    source,
                    destination,
                })
                .collect(),
        })
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
