//! Explorer configuration.
//!
//! Values come from an optional YAML file; command line flags and
//! environment variables override them (see `main.rs`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aeronet_client::client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_SITES_URL};
use aeronet_common::DEFAULT_SITE;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/explorer.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Address the web UI listens on.
    pub listen: String,

    /// Directory for cached AERONET responses.
    pub cache_dir: PathBuf,

    pub aeronet: AeronetSettings,

    pub ui: UiSettings,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8501".to_string(),
            cache_dir: PathBuf::from("data_cache"),
            aeronet: AeronetSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

/// Web service endpoints and request pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AeronetSettings {
    pub base_url: String,
    pub sites_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Minimum delay between consecutive requests
    pub request_delay_ms: u64,
    /// Overrides the built-in `User-Agent`
    pub user_agent: Option<String>,
}

impl Default for AeronetSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sites_url: DEFAULT_SITES_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            request_delay_ms: 1000,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub default_site: String,
    /// Days before today preselected as the start date
    pub default_span_days: i64,
    pub plot_width: u32,
    pub plot_height: u32,
    pub map_width: u32,
    pub map_height: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        let (plot_width, plot_height) = renderer::DEFAULT_PLOT_SIZE;
        let (map_width, map_height) = renderer::DEFAULT_MAP_SIZE;
        Self {
            default_site: DEFAULT_SITE.to_string(),
            default_span_days: 30,
            plot_width,
            plot_height,
            map_width,
            map_height,
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            user_agent: self.aeronet.user_agent.clone().unwrap_or(defaults.user_agent),
            base_url: self.aeronet.base_url.clone(),
            sites_url: self.aeronet.sites_url.clone(),
            request_timeout: Duration::from_secs(self.aeronet.timeout_secs),
            connect_timeout: Duration::from_secs(self.aeronet.connect_timeout_secs),
            request_delay: Duration::from_millis(self.aeronet.request_delay_ms),
        }
    }

    pub fn plot_size(&self) -> (u32, u32) {
        (self.ui.plot_width, self.ui.plot_height)
    }

    pub fn map_size(&self) -> (u32, u32) {
        (self.ui.map_width, self.ui.map_height)
    }
}
