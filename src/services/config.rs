use crate::models::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    NoConfigDir,
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration manager for app settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager rooted at the platform config directory
    /// (`<config_dir>/price-scan/config.json`)
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("price-scan");

        Ok(Self::with_dir(config_dir))
    }

    /// Create a ConfigManager rooted at an explicit directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_path = config_dir.join("config.json");

        Self {
            config_dir,
            config_path,
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;

        fs::create_dir_all(&self.config_dir)?;

        // Pretty print for human readability
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, json)?;

        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.config_exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(ConfigError::Invalid)?;

        tracing::debug!(path = %self.config_path.display(), "configuration loaded");
        Ok(config)
    }

    /// Get the config file path
    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    /// Check if config file exists
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}
