//! Configuration handling for Cadence
//!
//! Configuration lives in the platform config directory
//! (`~/.config/cadence/config.toml` on Linux). Everything has a default;
//! a missing file is not an error.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Could not determine a home directory for config/data paths")]
    NoHomeDirectory,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the event log; defaults to the platform data directory
    pub log_path: Option<PathBuf>,

    /// Default trailing window for strength reports, in days (0 = all-time)
    pub strength_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: None,
            strength_window_days: 30,
        }
    }
}

impl Config {
    /// Loads the global configuration, falling back to defaults when the
    /// file does not exist
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Some(p) if p.is_file() => p,
            _ => return Ok(Self::default()),
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config =
            toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Path to the global config file, if a home directory exists
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cadence").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolves the log path: explicit override, then config, then the
    /// platform data directory
    pub fn resolve_log_path(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path);
        }
        if let Some(path) = &self.log_path {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("", "", "cadence").ok_or(ConfigError::NoHomeDirectory)?;
        Ok(dirs.data_dir().join("log.jsonl"))
    }
}
