//! Unified path management for yarnl files.
//!
//! ```text
//! ~/.config/yarnl/             # Config directory (or --config-dir)
//! ├── config.toml              # Shell configuration
//! ├── preferences.toml         # Server URL, push token, flags
//! ├── cookies.toml             # Persistent cookie jar
//! └── logs/
//!     └── yarnl.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR_NAME: &str = "yarnl";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

/// Resolved locations of every file the shell owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YarnlPaths {
    config_dir: PathBuf,
}

impl YarnlPaths {
    /// Uses `base_dir` when given, otherwise the platform config dir joined with `yarnl`.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, PathError> {
        let config_dir = match base_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound)?,
        };
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.config_dir.join("preferences.toml")
    }

    pub fn cookies_file(&self) -> PathBuf {
        self.config_dir.join("cookies.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }
}
