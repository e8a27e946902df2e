//! Configuration for hero-api
//!
//! Settings come from a toml file (missing file means defaults) with the
//! Function app settings layered on top from the environment, so a deployed
//! host needs no file at all.

pub mod schema;

pub use schema::Config;

use crate::error::{HeroError, HeroResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes the hero-api config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for `<config dir>/hero-api/config.toml`
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for an explicit file, from `--config` or `HERO_CONFIG`
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hero-api")
            .join("config.toml")
    }

    /// File settings only; `config set` edits these so app settings from
    /// the environment never get written back
    pub async fn load(&self) -> HeroResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Effective settings: the file, then `KeyVaultName`,
    /// `TableStorageAccountName`, the custom handler port and the health
    /// toggles from the environment
    pub async fn load_with_env(&self) -> HeroResult<Config> {
        let mut config = self.load().await?;
        config.apply_env()?;
        Ok(config)
    }

    /// Parse a file; toml errors are reported against its path
    pub async fn load_from_file(&self, path: &Path) -> HeroResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| HeroError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| HeroError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write settings back, creating the directory on first use
    pub async fn save(&self, config: &Config) -> HeroResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            HeroError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    async fn ensure_config_dir(&self) -> HeroResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HeroError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
