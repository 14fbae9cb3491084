//! Configuration service.
//!
//! Loads [`ShellConfig`] from `config.toml`, writing the defaults out the first
//! time so users have a file to edit.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use yarnl_core::Result;
use yarnl_core::config::ShellConfig;

use crate::storage::AtomicTomlFile;

#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<ShellConfig>>,
    cached: Arc<RwLock<Option<ShellConfig>>>,
}

impl ConfigService {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(config_path)),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<ShellConfig> {
        if let Some(cached) = self
            .cached
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load_or_create()?;
        *self
            .cached
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        *self
            .cached
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    fn load_or_create(&self) -> Result<ShellConfig> {
        if let Some(config) = self.file.load()? {
            return Ok(config);
        }

        let config = ShellConfig::default();
        self.file.save(&config)?;
        tracing::info!(
            "[Config] Wrote default configuration to {}",
            self.file.path().display()
        );
        Ok(config)
    }
}
