//! Persisted configuration: the target index path and excluded folders.
//!
//! Settings live as JSON under the vault's `.tagdex/` directory. Loading is
//! lenient field by field: an unknown or wrong-typed field falls back to its
//! default without discarding the rest of the stored blob.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TagdexError};
use crate::paths::normalize_vault_folder_path;

/// Default target path for the generated index document.
pub const DEFAULT_TARGET_FILE_PATH: &str = "Tags.md";

/// Directory under the vault root holding tagdex state.
pub const SETTINGS_DIR: &str = ".tagdex";

/// Settings file name inside [`SETTINGS_DIR`].
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vault-relative path the index is written to.
    pub target_file_path: String,
    /// Folders excluded from tag scanning, in configuration order.
    pub excluded_folder_paths: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_file_path: DEFAULT_TARGET_FILE_PATH.to_string(),
            excluded_folder_paths: Vec::new(),
        }
    }
}

impl Settings {
    /// Decode a stored settings blob, falling back to defaults field by
    /// field on unknown or wrong-typed values.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = value.as_object() else {
            return defaults;
        };

        let target_file_path = map
            .get("target_file_path")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.target_file_path);

        let excluded_folder_paths = map
            .get("excluded_folder_paths")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.excluded_folder_paths);

        Self {
            target_file_path,
            excluded_folder_paths,
        }
    }

    /// Load settings from the vault, returning defaults when the file is
    /// missing or unreadable.
    #[must_use]
    pub fn load(vault_root: &Path) -> Self {
        let path = Self::file_path(vault_root);
        let Ok(text) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "stored settings are not valid JSON, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Persist settings into the vault's `.tagdex/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`TagdexError::Io`] when the directory or file cannot be
    /// written.
    pub fn save(&self, vault_root: &Path) -> Result<()> {
        let dir = vault_root.join(SETTINGS_DIR);
        fs::create_dir_all(&dir)?;
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| TagdexError::Serialization(e.to_string()))?;
        fs::write(dir.join(SETTINGS_FILE), text)?;
        Ok(())
    }

    /// Location of the settings file for a vault.
    #[must_use]
    pub fn file_path(vault_root: &Path) -> PathBuf {
        vault_root.join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// Excluded folders in normalized form; invalid entries are dropped.
    #[must_use]
    pub fn normalized_excluded_folders(&self) -> Vec<String> {
        self.excluded_folder_paths
            .iter()
            .filter_map(|folder| normalize_vault_folder_path(folder))
            .collect()
    }

    /// True when `candidate` is already excluded, either directly or by a
    /// parent folder in the exclusion list.
    #[must_use]
    pub fn covers_folder(&self, candidate: &str) -> bool {
        self.normalized_excluded_folders().iter().any(|existing| {
            existing == candidate || candidate.starts_with(&format!("{existing}/"))
        })
    }
}
