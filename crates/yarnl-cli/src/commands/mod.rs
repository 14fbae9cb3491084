pub mod cookies;
pub mod push;
pub mod session;
pub mod setup;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use yarnl_core::ServerConfig;
use yarnl_core::config::ShellConfig;
use yarnl_core::preferences::PreferenceStore;
use yarnl_infrastructure::{ConfigService, FilePreferenceStore, PersistentCookieJar, YarnlPaths};

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub paths: YarnlPaths,
    pub config: ShellConfig,
    pub prefs: Arc<FilePreferenceStore>,
    pub jar: Arc<PersistentCookieJar>,
}

impl AppContext {
    /// Resolves paths and reads `config.toml`, which the log subscriber is
    /// built from. The stores are left alone so their warnings are logged.
    pub fn locate(config_dir: Option<PathBuf>) -> Result<(YarnlPaths, ShellConfig)> {
        let paths = YarnlPaths::new(config_dir)?;
        let config = ConfigService::new(paths.config_file())
            .get_config()
            .context("Failed to load config.toml")?;
        Ok((paths, config))
    }

    /// Opens the stores. Call after logging is initialized.
    pub fn open(paths: YarnlPaths, config: ShellConfig) -> Self {
        let prefs = Arc::new(FilePreferenceStore::open(paths.preferences_file()));
        let jar = match PersistentCookieJar::open(paths.cookies_file()) {
            Ok(jar) => jar,
            Err(e) => {
                tracing::warn!("[Shell] Starting with an empty cookie jar: {}", e);
                PersistentCookieJar::empty(paths.cookies_file())
            }
        };
        Self {
            paths,
            config,
            prefs,
            jar: Arc::new(jar),
        }
    }

    /// The saved server, or an error telling the user to run setup.
    pub async fn server(&self) -> Result<ServerConfig> {
        let Some(url) = self.prefs.get_server_url().await else {
            bail!("No server configured. Run `yarnl setup <url>` first.");
        };
        Ok(ServerConfig::parse(&url)?)
    }
}
