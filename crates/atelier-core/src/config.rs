//! Configuration for the Atelier editing stack.
//!
//! Supports reading overrides from `~/.config/atelier/config.toml`; every
//! field has a default so the file is optional.

use crate::error::{EditorError, Result};
use crate::history::DEFAULT_HISTORY_BUDGET_BYTES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tunables for an editing session and its service clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Base URL of the AI mutation service.
    #[serde(default = "default_mutation_endpoint")]
    pub mutation_endpoint: String,
    /// Base URL of the draft persistence/publish endpoint.
    #[serde(default = "default_persistence_endpoint")]
    pub persistence_endpoint: String,
    /// Hard deadline for one mutation request, in seconds.
    #[serde(default = "default_mutation_timeout_secs")]
    pub mutation_timeout_secs: u64,
    /// Quiescence window before an autosave fires, in milliseconds.
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,
    /// Memory budget for retained undo snapshots, in bytes.
    #[serde(default = "default_history_budget_bytes")]
    pub history_budget_bytes: usize,
}

fn default_mutation_endpoint() -> String {
    "https://api.atelier.dev/v1/mutations".to_string()
}

fn default_persistence_endpoint() -> String {
    "https://api.atelier.dev/v1/pages".to_string()
}

fn default_mutation_timeout_secs() -> u64 {
    120
}

fn default_autosave_debounce_ms() -> u64 {
    3_000
}

fn default_history_budget_bytes() -> usize {
    DEFAULT_HISTORY_BUDGET_BYTES
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mutation_endpoint: default_mutation_endpoint(),
            persistence_endpoint: default_persistence_endpoint(),
            mutation_timeout_secs: default_mutation_timeout_secs(),
            autosave_debounce_ms: default_autosave_debounce_ms(),
            history_budget_bytes: default_history_budget_bytes(),
        }
    }
}

impl EditorConfig {
    /// Loads configuration from the default location, falling back to
    /// defaults when the file does not exist.
    pub fn load_or_default() -> Self {
        match config_path() {
            Ok(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config, using defaults: {e}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Loads configuration from an explicit TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EditorError::config(format!(
                "Failed to read configuration file at {}: {e}",
                path.display()
            ))
        })?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Returns the path to the configuration file: ~/.config/atelier/config.toml
fn config_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| EditorError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("atelier").join("config.toml"))
}
