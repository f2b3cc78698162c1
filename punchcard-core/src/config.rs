//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/punchcard/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/punchcard/` (~/.config/punchcard/)
//! - Data: `$XDG_DATA_HOME/punchcard/` (~/.local/share/punchcard/)
//! - State/Logs: `$XDG_STATE_HOME/punchcard/` (~/.local/state/punchcard/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Override for the database file path
    pub path: Option<PathBuf>,

    /// How long a statement waits on a locked database before failing
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

fn default_busy_timeout_secs() -> u64 {
    5
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/punchcard/config.toml` (~/.config/punchcard/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("punchcard").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/punchcard/` (~/.local/share/punchcard/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("punchcard")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/punchcard/` (~/.local/state/punchcard/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("punchcard")
    }

    /// Returns the database file path, honoring the config override
    ///
    /// Default: `$XDG_DATA_HOME/punchcard/sessions.db`
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("sessions.db"))
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/punchcard/punchcard.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("punchcard.log")
    }
}
