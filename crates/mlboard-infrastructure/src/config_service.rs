//! Configuration file loading.
//!
//! Reads `~/.config/mlboard/config.toml`. A missing file means defaults;
//! the `MLBOARD_BASE_URL` environment variable overrides the base URL
//! either way.

use std::fs;
use std::path::Path;

use mlboard_core::config::AppConfig;
use mlboard_core::error::Result;

use crate::paths::BoardPaths;

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "MLBOARD_BASE_URL";

/// Loads the application configuration from the default location.
pub fn load_config() -> Result<AppConfig> {
    let path = BoardPaths::config_file()
        .map_err(|e| mlboard_core::BoardError::storage(e.to_string()))?;
    load_config_from(&path)
}

/// Loads the application configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        AppConfig::default()
    };

    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.trim().is_empty() {
            config.base_url = base_url.trim().to_string();
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlboard_core::config::DEFAULT_TIMEOUT_SECS;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn file_values_are_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"https://automl.example.com\"\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.base_url, "https://automl.example.com");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
