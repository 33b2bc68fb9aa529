//! Configuration file support for Cooper.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/cooper/config.toml`.

use crate::{Error, Locale, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Values a new evaluation form starts with
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_duration_seconds")]
    pub default_duration_seconds: f64,

    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    #[serde(default = "default_humidity")]
    pub default_humidity: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_duration_seconds: default_duration_seconds(),
            default_temperature: default_temperature(),
            default_humidity: default_humidity(),
        }
    }
}

/// Output language
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("cooper")
}

fn default_duration_seconds() -> f64 {
    720.0
}

fn default_temperature() -> f64 {
    20.0
}

fn default_humidity() -> f64 {
    50.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject defaults that could never pass form validation
    pub fn validate(&self) -> Result<()> {
        let duration = self.evaluation.default_duration_seconds;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::Config(format!(
                "default_duration_seconds must be positive, got {}",
                duration
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("cooper").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
