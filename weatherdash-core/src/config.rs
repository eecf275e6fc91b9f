use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    error::ErrorKind, provider::openweather::DEFAULT_BASE_URL, retry::RetryPolicy, units::Units,
};

/// Environment variable that takes precedence over `api.key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Connection settings for the weather provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: String,
    pub base_url: String,
    pub icon_base_url: String,
    pub units: Units,
    /// Language code for condition descriptions.
    pub language: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            icon_base_url: "https://openweathermap.org/img/wn".to_string(),
            units: Units::Metric,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// City shown when there is no previous search.
    pub default_city: String,
    pub cache_duration_ms: u64,
    pub request_timeout_ms: u64,
    /// Total attempts made by the retry wrapper, including the first.
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_city: "London".to_string(),
            cache_duration_ms: 10 * 60 * 1000,
            request_timeout_ms: 8000,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub cache: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self { cache: true }
    }
}

/// User-facing failure messages, one per error kind.
///
/// `upstream_error` may contain a `{status}` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub api_key_missing: String,
    pub invalid_input: String,
    pub city_not_found: String,
    pub unauthorized: String,
    pub rate_limited: String,
    pub server_error: String,
    pub upstream_error: String,
    pub request_timeout: String,
    pub network_error: String,
    pub malformed_response: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            api_key_missing: "API key is missing. Please check your configuration.".to_string(),
            invalid_input: "Please enter a valid city name.".to_string(),
            city_not_found: "City not found. Please check the spelling and try again.".to_string(),
            unauthorized: "Invalid API key. Please check your configuration.".to_string(),
            rate_limited: "Too many requests. Please wait a moment and try again.".to_string(),
            server_error: "Weather service is temporarily unavailable. Please try again later."
                .to_string(),
            upstream_error: "Weather service error ({status}). Please try again.".to_string(),
            request_timeout: "Request timed out. Please try again.".to_string(),
            network_error: "Network error. Please check your internet connection.".to_string(),
            malformed_response: "Received incomplete weather data. Please try again later."
                .to_string(),
        }
    }
}

impl Messages {
    pub fn for_kind(&self, kind: ErrorKind) -> String {
        match kind {
            ErrorKind::InvalidInput => self.invalid_input.clone(),
            ErrorKind::NotFound => self.city_not_found.clone(),
            ErrorKind::Unauthorized => self.unauthorized.clone(),
            ErrorKind::RateLimited => self.rate_limited.clone(),
            ErrorKind::ServerUnavailable => self.server_error.clone(),
            ErrorKind::UpstreamError(status) => {
                self.upstream_error.replace("{status}", &status.to_string())
            }
            ErrorKind::Timeout => self.request_timeout.clone(),
            ErrorKind::NetworkUnavailable => self.network_error.clone(),
            ErrorKind::MalformedResponse => self.malformed_response.clone(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [api]
/// key = "..."
/// units = "imperial"
///
/// [app]
/// cache_duration_ms = 300000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub app: AppConfig,
    pub features: Features,
    pub messages: Messages,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// API key from the environment or the config file, if non-blank.
    pub fn api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        from_env
            .iter()
            .chain(std::iter::once(&self.api.key))
            .map(|key| key.trim())
            .find(|key| !key.is_empty())
            .map(str::to_owned)
    }

    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "{}\nHint: run `weatherdash configure` or set {API_KEY_ENV}.",
                self.messages.api_key_missing
            )
        })
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api.key = key.trim().to_string();
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_millis(self.app.cache_duration_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.app.request_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.app.retry_attempts,
            Duration::from_millis(self.app.retry_delay_ms),
        )
    }

    /// Icon image URL; `size` is e.g. "2x" (100px) or "4x" (200px).
    pub fn icon_url(&self, icon: &str, size: &str) -> String {
        format!("{}/{icon}@{size}.png", self.api.icon_base_url.trim_end_matches('/'))
    }
}
