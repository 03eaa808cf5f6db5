//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Missing {service} API key: set {env_var} or `api_key` in the config file")]
    MissingCredential {
        service: &'static str,
        env_var: String,
    },
}

/// Look up a credential inline first, then in the environment.
fn resolve_credential(
    service: &'static str,
    inline: Option<&String>,
    env_var: &str,
) -> Result<String, ConfigError> {
    if let Some(key) = inline.filter(|k| !k.trim().is_empty()) {
        return Ok(key.clone());
    }

    std::env::var(env_var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingCredential {
            service,
            env_var: env_var.to_string(),
        })
}

/// FACEIT Data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceitConfig {
    #[serde(default = "default_faceit_base_url")]
    pub base_url: String,

    /// Server-side API key; prefer `api_key_env`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_faceit_key_env")]
    pub api_key_env: String,

    /// Items requested per stats page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Game categories drained in order; the first is the primary game
    #[serde(default = "default_games")]
    pub games: Vec<String>,
}

fn default_faceit_base_url() -> String {
    "https://open.faceit.com/data/v4".to_string()
}

fn default_faceit_key_env() -> String {
    "FACEIT_API_KEY".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout() -> u64 {
    20
}

fn default_games() -> Vec<String> {
    vec!["cs2".to_string(), "csgo".to_string()]
}

impl Default for FaceitConfig {
    fn default() -> Self {
        Self {
            base_url: default_faceit_base_url(),
            api_key: None,
            api_key_env: default_faceit_key_env(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
            games: default_games(),
        }
    }
}

impl FaceitConfig {
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        resolve_credential("FACEIT", self.api_key.as_ref(), &self.api_key_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Game whose skill level and elo go on the profile.
    pub fn primary_game(&self) -> &str {
        self.games.first().map(String::as_str).unwrap_or("cs2")
    }
}

/// Steam Web API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamConfig {
    #[serde(default = "default_steam_base_url")]
    pub base_url: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_steam_key_env")]
    pub api_key_env: String,

    /// App id whose playtime is measured (730 = Counter-Strike 2)
    #[serde(default = "default_target_app_id")]
    pub target_app_id: u32,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_steam_base_url() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_steam_key_env() -> String {
    "STEAM_API_KEY".to_string()
}

fn default_target_app_id() -> u32 {
    730
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            base_url: default_steam_base_url(),
            api_key: None,
            api_key_env: default_steam_key_env(),
            target_app_id: default_target_app_id(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl SteamConfig {
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        resolve_credential("Steam", self.api_key.as_ref(), &self.api_key_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Sizes of the recent and earliest match windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_recent_matches")]
    pub recent_matches: usize,

    #[serde(default = "default_earliest_matches")]
    pub earliest_matches: usize,
}

fn default_recent_matches() -> usize {
    20
}

fn default_earliest_matches() -> usize {
    10
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            recent_matches: default_recent_matches(),
            earliest_matches: default_earliest_matches(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub faceit: FaceitConfig,

    #[serde(default)]
    pub steam: SteamConfig,

    #[serde(default)]
    pub windows: WindowConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            faceit: FaceitConfig::default(),
            steam: SteamConfig::default(),
            windows: WindowConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.faceit.timeout_seconds == 0 || self.steam.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.faceit.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "FACEIT page size must be greater than 0".to_string(),
            ));
        }

        if self.faceit.games.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one FACEIT game category is required".to_string(),
            ));
        }

        if self.windows.recent_matches == 0 || self.windows.earliest_matches == 0 {
            return Err(ConfigError::ValidationError(
                "Window sizes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
