//! File-backed [`PreferenceStore`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use yarnl_core::preferences::{PreferenceStore, Preferences};
use yarnl_core::{Result, ServerConfig, YarnlError};

use crate::storage::AtomicTomlFile;

/// Preferences cached in memory and mirrored to `preferences.toml`.
///
/// Every mutation is persisted before the in-memory value and the watch
/// channel are updated, so subscribers never observe a value that failed to
/// reach disk.
pub struct FilePreferenceStore {
    file: Arc<AtomicTomlFile<Preferences>>,
    current: Mutex<Preferences>,
    sender: watch::Sender<Preferences>,
}

impl FilePreferenceStore {
    /// Loads `path`, starting from defaults when the file is missing or unreadable.
    pub fn open(path: PathBuf) -> Self {
        let file = AtomicTomlFile::new(path);
        let initial = match file.load() {
            Ok(loaded) => loaded.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("[Preferences] Ignoring unreadable preferences: {}", e);
                Preferences::default()
            }
        };
        let (sender, _) = watch::channel(initial.clone());
        Self {
            file: Arc::new(file),
            current: Mutex::new(initial),
            sender,
        }
    }

    async fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Preferences) -> R,
    {
        let mut current = self.current.lock().await;
        let mut next = current.clone();
        let result = f(&mut next);
        if next == *current {
            return Ok(result);
        }

        self.persist(next.clone()).await?;
        *current = next.clone();
        self.sender.send_replace(next);
        Ok(result)
    }

    async fn persist(&self, prefs: Preferences) -> Result<()> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.save(&prefs))
            .await
            .map_err(|e| YarnlError::internal(format!("preference write task failed: {}", e)))??;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn snapshot(&self) -> Preferences {
        self.current.lock().await.clone()
    }

    fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.sender.subscribe()
    }

    async fn save_server_url(&self, server: &ServerConfig) -> Result<()> {
        let url = server.base_url().to_string();
        self.mutate(|prefs| prefs.server_url = Some(url)).await?;
        tracing::info!("[Preferences] Server URL saved: {}", server);
        Ok(())
    }

    async fn save_push_token(&self, token: &str) -> Result<bool> {
        self.mutate(|prefs| prefs.replace_push_token(token)).await
    }

    async fn set_push_registered(&self, registered: bool) -> Result<()> {
        self.mutate(|prefs| prefs.push_registered = registered).await
    }

    async fn mark_push_registered(&self, token: &str) -> Result<bool> {
        self.mutate(|prefs| prefs.mark_registered(token)).await
    }

    async fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.mutate(|prefs| prefs.notifications_enabled = enabled)
            .await
    }

    async fn clear_all(&self) -> Result<()> {
        let mut current = self.current.lock().await;
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| YarnlError::internal(format!("preference clear task failed: {}", e)))??;
        *current = Preferences::default();
        self.sender.send_replace(Preferences::default());
        tracing::info!("[Preferences] All preferences cleared");
        Ok(())
    }
}
