//! Preference store trait.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::Result;
use crate::preferences::model::Preferences;
use crate::server::ServerConfig;

/// Durable key/value storage for the shell's scalar preferences.
///
/// Implementations are constructed once per process and shared as
/// `Arc<dyn PreferenceStore>`.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Current values of all preferences.
    async fn snapshot(&self) -> Preferences;

    /// Observable stream of preference changes for UI binding.
    fn subscribe(&self) -> watch::Receiver<Preferences>;

    async fn get_server_url(&self) -> Option<String> {
        self.snapshot().await.server_url
    }

    /// Persists a validated server configuration, replacing the previous one.
    async fn save_server_url(&self, server: &ServerConfig) -> Result<()>;

    async fn get_push_token(&self) -> Option<String> {
        self.snapshot().await.push_token
    }

    /// Persists a push token.
    ///
    /// Returns whether the token changed; a changed token also resets the
    /// registered flag in the same write.
    async fn save_push_token(&self, token: &str) -> Result<bool>;

    async fn get_push_registered(&self) -> bool {
        self.snapshot().await.push_registered
    }

    async fn set_push_registered(&self, registered: bool) -> Result<()>;

    /// Sets the registered flag only if `token` is still the stored token,
    /// checked and written as one step. Returns false for a superseded token.
    async fn mark_push_registered(&self, token: &str) -> Result<bool>;

    async fn get_notifications_enabled(&self) -> bool {
        self.snapshot().await.notifications_enabled
    }

    async fn set_notifications_enabled(&self, enabled: bool) -> Result<()>;

    /// Removes every stored preference.
    async fn clear_all(&self) -> Result<()>;
}
