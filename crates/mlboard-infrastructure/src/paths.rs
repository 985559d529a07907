//! Unified path management for MLBoard client state.
//!
//! All durable state lives under one configuration directory:
//!
//! ```text
//! ~/.config/mlboard/           # Config directory
//! ├── config.toml              # Application configuration
//! ├── session.json             # Bearer token + user profile
//! ├── upload_cache.json        # Short-lived cached upload response
//! └── history.txt              # REPL input history
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for MLBoard.
pub struct BoardPaths;

impl BoardPaths {
    /// Returns the MLBoard configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/mlboard/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("mlboard"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted session file.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }

    /// Returns the path to the cached upload response.
    pub fn upload_cache_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("upload_cache.json"))
    }

    /// Returns the path to the REPL history file.
    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("history.txt"))
    }
}
