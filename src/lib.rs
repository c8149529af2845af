pub mod cli;
pub mod collector;
pub mod core;
pub mod providers;

use crate::cli::rates::OutputFormat;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use tracing::{debug, info};

pub enum AppCommand {
    /// Fetch rates; an empty `pairs` uses the configured list.
    Rates {
        pairs: Vec<String>,
        format: OutputFormat,
    },
}

/// Settings given on the command line that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub config_path: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

pub fn load_config(overrides: &Overrides<'_>) -> Result<AppConfig> {
    let mut config = match overrides.config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(api_key) = overrides.api_key {
        config.api.api_key = api_key.to_string();
    }
    Ok(config)
}

pub async fn run_command(command: AppCommand, overrides: &Overrides<'_>) -> Result<()> {
    info!("fxrates starting...");
    let mut config = load_config(overrides)?;

    match command {
        AppCommand::Rates { pairs, format } => {
            if !pairs.is_empty() {
                config.pairs = pairs;
            }
            config.validate()?;
            debug!(pairs = ?config.pairs, base_url = %config.api.base_url, "Loaded config");

            let key_path = config.api.private_key_path();
            let key = crate::core::keys::load_signing_key(&key_path)
                .with_context(|| format!("Failed to load private key {}", key_path.display()))?;
            let provider = crate::providers::WalutomatProvider::new(&config.api, key)?;

            cli::rates::run(&provider, &config.pairs, format).await
        }
    }
}
