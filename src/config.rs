use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::frame_size::FrameSize;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_LOCALHOST_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sync server that receives exports and serves imports
    pub api_url: String,
    /// Dev server the exported files are served from
    pub localhost_url: String,
    pub auto_sync: bool,
    pub watch_mode: bool,
    pub sync_colors: bool,
    pub sync_typography: bool,
    /// Frame that hosts imported elements
    pub frame: FrameSize,
    pub timeouts: Timeouts,
    pub watch: WatchConfig,
}

/// Sync-server requests wait indefinitely unless `request` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub request: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            localhost_url: DEFAULT_LOCALHOST_URL.to_string(),
            auto_sync: false,
            watch_mode: false,
            sync_colors: true,
            sync_typography: true,
            frame: FrameSize::default(),
            timeouts: Timeouts::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Config {
    /// `~/.config/figsync/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("figsync")
                    .join("config.toml")
            })
    }

    /// Explicit path (must exist) > central config (if present) > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.is_file() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("api_url", &self.api_url), ("localhost_url", &self.localhost_url)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
            Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{name} '{value}' is not a URL: {e}")))?;
        }
        if self.timeouts.request.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid(
                "timeouts.request must be greater than zero".into(),
            ));
        }
        if self.watch.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "watch.interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
