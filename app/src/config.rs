use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde_derive::Deserialize;

fn default_true() -> bool {
    true
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_order_timeout_ms() -> u64 {
    15_000
}

fn default_images_dir() -> PathBuf {
    "images".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_true")]
    pub health_check: bool,
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default = "default_order_timeout_ms")]
    pub order_timeout_ms: u64,
}

impl ApiConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn order_timeout(&self) -> Duration {
        Duration::from_millis(self.order_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostConfig {
    // Telegram user id to place orders as
    pub user_id: Option<i64>,
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            images_dir: default_images_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub host: HostConfig,
}

impl Config {
    pub fn from_file(file: &str) -> Result<Self> {
        let toml_string = fs::read_to_string(file).with_context(|| {
            format!(
                "Error when trying to read the config file {}. \
                Make sure miniapp.toml is in /config directory.",
                file
            )
        })?;
        Self::from_toml_string(&toml_string)
    }

    pub fn from_toml_string(input: &str) -> Result<Self> {
        toml::from_str(input).context("Error parsing TOML in the config file.")
    }
}
