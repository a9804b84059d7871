//! Per-profile CLI settings in `~/.chorrus/config.toml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chorrus_client::ClientConfig;
use chorrus_client::config::loader::load_config;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
    pub firebase_api_key: Option<String>,
}

impl ProfileConfig {
    /// Applies `key = value` as given to `chorrus config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => self.server = Some(value.to_string()),
            "format" => {
                <OutputFormat as clap::ValueEnum>::from_str(value, true)
                    .map_err(|e| anyhow::anyhow!("Invalid format '{value}': {e}"))?;
                self.format = Some(value.to_ascii_lowercase());
            }
            "firebase-api-key" => self.firebase_api_key = Some(value.to_string()),
            other => anyhow::bail!(
                "Unknown config key: {other}. Valid keys: server, format, firebase-api-key"
            ),
        }
        Ok(())
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format
            .as_deref()
            .and_then(|f| <OutputFormat as clap::ValueEnum>::from_str(f, true).ok())
    }
}

pub type ConfigFile = BTreeMap<String, ProfileConfig>;

/// `~/.chorrus`, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".chorrus");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.toml"))
}

pub fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)?;
    let cfg: ConfigFile =
        toml::from_str(&content).with_context(|| format!("Invalid {}", path.display()))?;
    Ok(cfg)
}

pub fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all_from(&config_path()?)?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

/// Client settings for this invocation.
///
/// `chorrus.toml` and `CHORRUS__*` come first, then the profile, then
/// `--server` / `CHORRUS_API_URL`.
pub fn resolve_client_config(
    cli_server: Option<&str>,
    config_path: Option<&str>,
    profile: &ProfileConfig,
) -> Result<ClientConfig> {
    let mut cfg = load_config(config_path).map_err(anyhow::Error::msg)?;
    if let Some(server) = &profile.server {
        cfg.api_url = server.clone();
    }
    if let Some(server) = cli_server {
        cfg.api_url = server.to_string();
    }
    if let Some(key) = &profile.firebase_api_key {
        cfg.firebase.api_key = Some(key.clone());
    }
    cfg.validate().map_err(anyhow::Error::msg)?;
    Ok(cfg)
}
