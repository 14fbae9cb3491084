//! First-run setup and server changes from settings.

use std::sync::Arc;

use tracing::info;
use yarnl_core::preferences::PreferenceStore;
use yarnl_core::server::{INVALID_URL_MESSAGE, is_valid_url};
use yarnl_core::shortcut::{RecentShortcutSync, ShortcutPublisher};
use yarnl_core::{Result, ServerConfig};
use yarnl_interaction::{ConnectionProber, ProbeOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Probe passed and the normalized URL is stored.
    Saved(ServerConfig),
    /// Input rejected before any network traffic.
    Invalid(String),
    /// Probe failed; nothing was stored.
    Unreachable(String),
}

pub struct ServerSetup {
    prober: ConnectionProber,
    prefs: Arc<dyn PreferenceStore>,
    recent: RecentShortcutSync,
}

impl ServerSetup {
    pub fn new(
        prober: ConnectionProber,
        prefs: Arc<dyn PreferenceStore>,
        publisher: Arc<dyn ShortcutPublisher>,
    ) -> Self {
        Self {
            prober,
            prefs,
            recent: RecentShortcutSync::new(publisher),
        }
    }

    /// Validate, probe, then persist. Only storage failures are errors.
    ///
    /// Switching to a different server drops the recent-item shortcut, which
    /// points at an item of the old server.
    pub async fn submit(&mut self, input: &str) -> Result<SetupOutcome> {
        if !is_valid_url(input) {
            return Ok(SetupOutcome::Invalid(INVALID_URL_MESSAGE.to_string()));
        }
        let server = match ServerConfig::parse(input) {
            Ok(server) => server,
            Err(e) => return Ok(SetupOutcome::Invalid(e.user_message())),
        };

        match self.prober.probe(server.base_url()).await {
            ProbeOutcome::Success => {
                let previous = self.prefs.get_server_url().await;
                self.prefs.save_server_url(&server).await?;
                if previous.is_some_and(|url| url != server.base_url()) {
                    info!("[Setup] Server changed, dropping recent shortcut");
                    self.recent.clear();
                }
                info!("[Setup] Connected to {}", server);
                Ok(SetupOutcome::Saved(server))
            }
            ProbeOutcome::Error(message) => Ok(SetupOutcome::Unreachable(message)),
        }
    }
}
