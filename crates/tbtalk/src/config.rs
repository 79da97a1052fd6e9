//! Configuration management for tbtalk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "tbtalk";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TBTALK_`)
/// 2. TOML config file at `~/.config/tbtalk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export configuration.
    pub export: ExportConfig,
    /// Meeting defaults.
    pub meeting: MeetingConfig,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the summary document is written to.
    /// Defaults to `~/.local/share/tbtalk`.
    pub output_dir: Option<PathBuf>,
    /// Prefix for the timestamped export file name.
    pub filename_prefix: String,
    /// Keep the export file on disk after it has been shown.
    /// When false, the file is removed best-effort once printed.
    pub keep_file: bool,
}

/// Defaults for a freshly started meeting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingConfig {
    /// Default meeting place.
    pub place: String,
    /// Default work description.
    pub work: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None, // Will be resolved to default at runtime
            filename_prefix: "meeting".to_string(),
            keep_file: true,
        }
    }
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            place: "Site A".to_string(),
            work: "work at height".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `TBTALK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("TBTALK_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.export.filename_prefix.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "filename_prefix must not be empty".to_string(),
            });
        }

        if self
            .export
            .filename_prefix
            .contains(std::path::is_separator)
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "filename_prefix '{}' must not contain path separators",
                    self.export.filename_prefix
                ),
            });
        }

        Ok(())
    }

    /// Get the export output directory, resolving defaults if not set.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }
}
