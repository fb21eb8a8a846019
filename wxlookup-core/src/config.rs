use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::LookupError, hourly::HourFallback};

pub const DEFAULT_IP_API_URL: &str = "http://ip-api.com/json/";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEZONE: &str = "Asia/Singapore";
pub const DEFAULT_CANDIDATE_COUNT: u8 = 10;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Base URLs of the three upstream services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub ip_api_url: String,
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ip_api_url: DEFAULT_IP_API_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// All three services served from one base URL. Used to point the pipeline at a mock server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            ip_api_url: format!("{base}/json/"),
            geocoding_url: format!("{base}/v1/search"),
            forecast_url: format!("{base}/v1/forecast"),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timezone = "Europe/Berlin"
/// candidate_count = 10
/// hour_fallback = "fail"
///
/// [endpoints]
/// forecast_url = "https://api.open-meteo.com/v1/forecast"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,

    /// IANA timezone the forecast series is requested in.
    pub timezone: String,

    /// Number of geocoding candidates requested. Only the first is used.
    pub candidate_count: u8,

    pub language: String,

    pub hour_fallback: HourFallback,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            language: DEFAULT_LANGUAGE.to_string(),
            hour_fallback: HourFallback::default(),
        }
    }
}

impl Config {
    /// Check values that would otherwise only fail once requests are sent.
    pub fn validate(&self) -> Result<(), LookupError> {
        if self.timezone.trim().is_empty() {
            return Err(LookupError::Config("timezone must not be empty".to_string()));
        }

        if self.candidate_count == 0 {
            return Err(LookupError::Config("candidate_count must be at least 1".to_string()));
        }

        let urls = [
            ("endpoints.ip_api_url", &self.endpoints.ip_api_url),
            ("endpoints.geocoding_url", &self.endpoints.geocoding_url),
            ("endpoints.forecast_url", &self.endpoints.forecast_url),
        ];

        for (name, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(LookupError::Config(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    /// Load config from the default location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the default location, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxlookup", "wxlookup")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
