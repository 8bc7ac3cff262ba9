use super::currency::Currency;
use super::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::providers::exchangerate_api::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_source() -> Currency {
    Currency::Usd
}

fn default_target() -> Currency {
    Currency::Pkr
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_source")]
    pub source: Currency,
    #[serde(default = "default_target")]
    pub target: Currency,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            refresh_interval_secs: default_refresh_interval_secs(),
            source: default_source(),
            target: default_target(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than zero");
        }
        if self.provider.base_url.trim().is_empty() {
            anyhow::bail!("provider.base_url must not be empty");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
