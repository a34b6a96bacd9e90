use serde::Deserialize;
use std::path::Path;

use crate::error::{ConjugatorError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

// Config file layout
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub input: InputConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: Option<f32>,
    /// No client-side timeout when unset.
    pub request_timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            api_key: None,
            model: "gemini-2.5-flash-lite".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: None,
            request_timeout_seconds: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub max_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig { max_chars: 1500 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// 0 keeps every response for the lifetime of the process.
    pub max_entries: usize,
}

impl Config {
    /// Reads a TOML config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let config_content = std::fs::read_to_string(path).map_err(|e| {
            ConjugatorError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&config_content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Replaces the configured key when `key` is given. Blank keys count as absent.
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key {
            self.api.api_key = Some(key);
        }
        self
    }

    pub fn credential(&self) -> Result<&str> {
        match self.api.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConjugatorError::NotReady),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.credential().is_ok()
    }
}
