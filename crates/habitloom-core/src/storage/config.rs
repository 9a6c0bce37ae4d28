//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - The default recurrence frequency for new habits
//! - The active user profile the CLI acts as
//!
//! Configuration is stored at `~/.config/habitloom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::habit::Frequency;

use super::data_dir;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Frequency used when `habit create` omits `--frequency`.
    #[serde(default)]
    pub default_frequency: Frequency,
    /// User profile commands act as when `--user` is omitted.
    #[serde(default)]
    pub active_user: Option<String>,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/habitloom"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Set a configuration value by key, as used by `config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "default_frequency" => {
                self.default_frequency =
                    Frequency::parse(value).ok_or_else(|| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("'{value}' is not daily, weekly, or monthly"),
                    })?;
            }
            "active_user" => {
                self.active_user = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
