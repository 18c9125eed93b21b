//! Configuration handling for tasklist
//!
//! Configuration is read from `--config <path>` when given, otherwise from
//! `config.toml` in the platform config directory (e.g.
//! `~/.config/tasklist/config.toml`). A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DeadlineClassifier, Priority, DEFAULT_CLOSE_THRESHOLD_DAYS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Days before a deadline at which a task counts as close
    pub close_threshold_days: f64,

    /// Priority the add form resets to
    pub default_priority: Priority,

    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// TUI redraw interval; urgency is recomputed on every redraw
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            close_threshold_days: DEFAULT_CLOSE_THRESHOLD_DAYS,
            default_priority: Priority::Medium,
            default_format: OutputFormat::Text,
            tick_rate_ms: 1000,
        }
    }
}

impl Config {
    /// Loads from an explicit path, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Loads and validates a config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Returns the platform config directory for tasklist
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tasklist", "tasklist").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        DeadlineClassifier::try_new(self.close_threshold_days)
            .map_err(|e| ConfigError::Invalid(format!("close_threshold_days: {}", e)))?;
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classifier(&self) -> DeadlineClassifier {
        DeadlineClassifier::new(self.close_threshold_days)
    }

    /// Serializes the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
