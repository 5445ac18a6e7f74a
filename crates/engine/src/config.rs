//! Store configuration.
//!
//! Read from `kgraph.toml` in the workspace root when present:
//!
//! ```toml
//! memory_file = "memory.jsonl"
//! locking = true
//! fsync = true
//! duplicate_ids = "keep_first"
//! ```
//!
//! Every field is optional; a missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use kgraph_core::{KgError, KgResult};
use kgraph_storage::{DuplicatePolicy, LoadOptions, SaveOptions};

/// Configuration file name looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "kgraph.toml";

/// Settings for a `GraphStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Memory file override. Relative paths are joined to the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_file: Option<PathBuf>,
    /// Take the advisory sidecar lock around every call.
    pub locking: bool,
    /// Flush the temporary file before renaming it into place.
    pub fsync: bool,
    /// Handling of repeated ids in a hand-edited file.
    pub duplicate_ids: DuplicatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            memory_file: None,
            locking: true,
            fsync: true,
            duplicate_ids: DuplicatePolicy::KeepFirst,
        }
    }
}

impl StoreConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> KgResult<Self> {
        toml::from_str(text).map_err(|e| KgError::config(e.to_string()))
    }

    /// Read `<root>/kgraph.toml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> KgResult<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(KgError::storage(
                    format!("failed to read {}", path.display()),
                    e,
                ))
            }
        };
        toml::from_str(&text)
            .map_err(|e| KgError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> KgResult<String> {
        toml::to_string(self).map_err(|e| KgError::config(e.to_string()))
    }

    /// Set the memory file override.
    pub fn with_memory_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.memory_file = Some(path.into());
        self
    }

    /// Enable or disable advisory locking.
    pub fn with_locking(mut self, locking: bool) -> Self {
        self.locking = locking;
        self
    }

    /// Enable or disable fsync before rename.
    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Set the duplicate-id policy used on load.
    pub fn with_duplicate_ids(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_ids = policy;
        self
    }

    pub(crate) fn load_options(&self) -> LoadOptions {
        LoadOptions {
            duplicates: self.duplicate_ids,
        }
    }

    pub(crate) fn save_options(&self) -> SaveOptions {
        SaveOptions { fsync: self.fsync }
    }
}
