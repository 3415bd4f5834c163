use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::Endpoints;
use crate::consts::{APP_DIR, DEFAULT_MODEL, INFERENCE_BASE_URL, PRICING_URL};
use crate::pricing::{FallbackSnapshot, PageLayout};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PRICING_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

/// User configuration, read from `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub pricing_url: Option<String>,
    #[serde(default)]
    pub pricing_timeout_secs: Option<u64>,
    #[serde(default)]
    pub cache_ttl_hours: Option<u64>,
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    #[serde(default)]
    pub fallback_path: Option<PathBuf>,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub no_color: bool,
    #[serde(default)]
    pub color: Option<ConfigColorMode>,
    #[serde(default)]
    pub pricing_layout: PageLayout,
}

impl Config {
    pub fn load() -> Self {
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // ~/.config/gradient-inference/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join(APP_DIR).join("config.toml"));
        }

        // Platform config dir (macOS Application Support, etc.)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join(APP_DIR).join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // ~/.gradient-inference.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{APP_DIR}.toml")));
        }

        paths
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::from_base(self.base_url.as_deref().unwrap_or(INFERENCE_BASE_URL))
    }

    pub fn model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn pricing_url(&self) -> &str {
        self.pricing_url.as_deref().unwrap_or(PRICING_URL)
    }

    pub fn pricing_timeout(&self) -> Duration {
        Duration::from_secs(
            self.pricing_timeout_secs
                .unwrap_or(DEFAULT_PRICING_TIMEOUT_SECS),
        )
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.unwrap_or(DEFAULT_CACHE_TTL_HOURS) * 60 * 60)
    }

    /// Configured cache file, or `~/.cache/gradient-inference/pricing.json`
    pub fn cache_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cache_path {
            return Some(path.clone());
        }
        let home = dirs::home_dir()?;
        Some(home.join(".cache").join(APP_DIR).join("pricing.json"))
    }

    pub fn fallback(&self) -> FallbackSnapshot {
        match &self.fallback_path {
            Some(path) => FallbackSnapshot::File(path.clone()),
            None => FallbackSnapshot::Bundled,
        }
    }
}
