//! Configuration management
//!
//! Loads and saves `~/.podium/config.toml`. Every field has a default so a
//! missing or partial file always produces a usable config. The same module
//! owns the application directories (config, logs, staged assets, runtime
//! sockets).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = ".podium";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Title of the projected display window
    #[serde(default = "default_display_title")]
    pub display_title: String,

    /// Display window width in terminal cells
    #[serde(default = "default_display_cols")]
    pub display_cols: u16,

    /// Display window height in terminal cells
    #[serde(default = "default_display_rows")]
    pub display_rows: u16,

    /// Terminal emulator to open the display window with
    ///
    /// When unset, a list of common emulators is tried in order.
    #[serde(default)]
    pub display_terminal: Option<String>,

    /// Days to keep log files before the startup sweep deletes them
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,
}

fn default_display_title() -> String {
    "Timer Display".to_string()
}

fn default_display_cols() -> u16 {
    100
}

fn default_display_rows() -> u16 {
    30
}

fn default_log_retention_days() -> u64 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_title: default_display_title(),
            display_cols: default_display_cols(),
            display_rows: default_display_rows(),
            display_terminal: None,
            log_retention_days: default_log_retention_days(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the config file
    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        let path = config_file_path();
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

/// The application config directory (`~/.podium`)
///
/// Falls back to a relative `.podium` when the home directory cannot be
/// determined.
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using relative path");
        PathBuf::from(APP_DIR)
    })
}

fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR))
}

/// Path of the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Directory for log files
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Directory for staged branding assets
pub fn assets_dir() -> PathBuf {
    config_dir().join("assets")
}

/// Directory for display sockets
pub fn run_dir() -> PathBuf {
    config_dir().join("run")
}

/// Create all application directories
pub fn ensure_directories() -> Result<()> {
    for dir in [config_dir(), logs_dir(), assets_dir(), run_dir()] {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Delete leftover display sockets from earlier runs
///
/// Sockets are removed when a surface closes; anything still here belongs
/// to a run that did not get that far.
pub fn sweep_run_dir() -> Result<usize> {
    let dir = run_dir();
    if !dir.exists() {
        return Ok(0);
    }
    let entries = std::fs::read_dir(&dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut removed = 0;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().map(|e| e == "sock").unwrap_or(false) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove stale socket {}: {}", path.display(), e),
            }
        }
    }
    Ok(removed)
}
