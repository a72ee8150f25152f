//! Application configuration settings.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{IdeaError, Result};

/// Default generation backend endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory where favorited ideas are stored
    pub favorites_dir: PathBuf,

    /// File caching the most recent generation result
    pub results_path: PathBuf,

    /// Base URL of the generation backend
    pub base_url: String,

    /// Model identifier used for generation requests
    pub model: String,

    /// API key for the backend; the IDEAFORGE_API_KEY environment variable
    /// takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How many ideas to request per generation
    pub default_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ideaforge");

        Config {
            favorites_dir: data_dir.join("favorites"),
            results_path: data_dir.join("last_generation.json"),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: 60,
            default_count: 5,
        }
    }
}

impl Config {
    /// Resolves the config file path, preferring an explicit override.
    pub fn resolve_path(override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(path) => path.to_path_buf(),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ideaforge")
                .join("config.json"),
        }
    }

    /// Loads the configuration from `path`, falling back to defaults when no
    /// file exists yet.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!(
                "No config file at {}, using defaults",
                path.display()
            );
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| IdeaError::ConfigError {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves the configuration to `path`, creating parent directories as
    /// needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|_| IdeaError::DirectoryError {
                    path: parent.to_path_buf(),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Applies a `key=value` setting from the CLI.
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| IdeaError::ConfigError {
                message: format!("expected key=value, got '{}'", assignment),
            })?;

        let key = key.trim();
        let value = value.trim();

        match key {
            "base_url" => self.base_url = value.trim_end_matches('/').to_string(),
            "model" => self.model = value.to_string(),
            "api_key" => {
                self.api_key = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "favorites_dir" => self.favorites_dir = PathBuf::from(value),
            "results_path" => self.results_path = PathBuf::from(value),
            "timeout_secs" => {
                self.timeout_secs = value.parse().map_err(|_| IdeaError::ConfigError {
                    message: format!("timeout_secs must be a number, got '{}'", value),
                })?
            }
            "default_count" => {
                self.default_count = value.parse().map_err(|_| IdeaError::ConfigError {
                    message: format!("default_count must be a number, got '{}'", value),
                })?
            }
            _ => {
                return Err(IdeaError::ConfigError {
                    message: format!("unknown configuration key: {}", key),
                })
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.default_count, 5);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_set_known_keys() {
        let mut config = Config::default();
        config.set("model=gemini-2.0-pro").unwrap();
        assert_eq!(config.model, "gemini-2.0-pro");

        config.set("timeout_secs=120").unwrap();
        assert_eq!(config.timeout_secs, 120);

        config.set("base_url=http://localhost:8080/").unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");

        config.set("api_key=abc123").unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));

        config.set("api_key=").unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_set_rejects_malformed_input() {
        let mut config = Config::default();
        assert!(config.set("no equals sign").is_err());
        assert!(config.set("unknown_key=1").is_err());
        assert!(config.set("timeout_secs=abc").is_err());
    }

    #[test]
    fn test_load_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.set("model=custom-model").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.model, "custom-model");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
