//! Persistent settings.
//!
//! Settings live in `settings.json` under the platform config directory.
//! Missing or unreadable files fall back to defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_LIST_LIMIT, DEFAULT_LOG_FILTER, DEFAULT_SLOW_FETCH_MS, SETTINGS_DIR, SETTINGS_FILE,
};
use crate::types::ListDefinition;

/// Tunables for list data sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Rows fetched by lists created without an explicit limit
    pub default_limit: usize,
    /// Fetches slower than this (ms) are logged as warnings
    pub slow_fetch_ms: f64,
    /// Log directive, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIST_LIMIT,
            slow_fetch_ms: DEFAULT_SLOW_FETCH_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Path of the settings file, if the platform has a config directory
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

impl ListSettings {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Install the global log subscriber with the configured filter.
    ///
    /// Returns `false` if a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        crate::logging::init(&self.log_filter)
    }

    /// A list definition for `model` using the configured default limit
    pub fn definition(&self, model: impl Into<String>) -> ListDefinition {
        ListDefinition::new(model).with_limit(self.default_limit)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Write atomically: a temp file in the same directory is persisted over `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        file.persist(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
