use super::rate::DEFAULT_PAIRS;
use anyhow::{Context, Result, bail};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.walutomat.pl";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_pairs() -> Vec<String> {
    DEFAULT_PAIRS.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub private_key_path: String,
    /// Per request timeout. No timeout is applied when unset.
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Private key path with a leading `~/` expanded to the home directory.
    pub fn private_key_path(&self) -> PathBuf {
        expand_home(&self.private_key_path)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default = "default_pairs")]
    pub pairs: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "fxrates", "fxrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.api_key.trim().is_empty() {
            bail!("No API key configured. Set api.api_key or FXRATES_API_KEY");
        }
        if self.pairs.is_empty() {
            bail!("No currency pairs configured");
        }
        for pair in &self.pairs {
            if !is_valid_pair(pair) {
                bail!("Invalid currency pair '{pair}', expected six uppercase letters such as EURPLN");
            }
        }
        Ok(())
    }
}

/// A pair is two three letter ISO currency codes, e.g. `USDPLN`.
pub fn is_valid_pair(pair: &str) -> bool {
    pair.len() == 6 && pair.bytes().all(|b| b.is_ascii_uppercase())
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base_dirs) = BaseDirs::new() {
            return base_dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
