//! Pre-authentication before the embedded view loads.
//!
//! One attempt runs three strictly ordered steps: who-am-I, auth mode, login.
//! Each step only runs when the previous one says it should, and every failure
//! degrades to "no fresh login" so the hosted page can fall back to its own
//! login screen.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::COOKIE;
use serde_json::json;
use yarnl_core::auth::{AUTH_MODE_PATH, AuthMode, LOGIN_PATH, WHO_AM_I_PATH};
use yarnl_core::config::Timeouts;
use yarnl_core::cookie::CookieJar;
use yarnl_core::{Result, ServerConfig};

use crate::http::{build_client, sync_response_cookies};

/// How a bootstrap attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// who-am-I answered 200; nothing was done.
    SessionValid,
    /// Auto-login succeeded and its cookies are in the jar.
    LoggedIn,
    /// The auth-mode request failed or carried no mode tag.
    AuthModeUnavailable,
    /// The server requires interactive login.
    InteractiveLoginRequired { mode: String },
    /// Single-user server without a default identity hint.
    NoDefaultIdentity,
    /// The login request failed or returned a status other than 200.
    LoginFailed { reason: String },
}

impl BootstrapOutcome {
    pub fn performed_fresh_login(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

#[derive(Clone)]
pub struct SessionBootstrapper {
    client: Client,
    jar: Arc<dyn CookieJar>,
}

impl SessionBootstrapper {
    pub fn new(jar: Arc<dyn CookieJar>, timeouts: Timeouts) -> Result<Self> {
        Ok(Self {
            client: build_client(timeouts)?,
            jar,
        })
    }

    /// Returns true only when a fresh login was performed.
    pub async fn ensure_authenticated(&self, server: &ServerConfig) -> bool {
        self.bootstrap(server).await.performed_fresh_login()
    }

    pub async fn bootstrap(&self, server: &ServerConfig) -> BootstrapOutcome {
        if self.check_session(server).await {
            tracing::info!("[Bootstrap] Existing session is valid");
            return BootstrapOutcome::SessionValid;
        }

        let Some(mode) = self.fetch_auth_mode(server).await else {
            tracing::info!("[Bootstrap] Auth mode unavailable; leaving login to the page");
            return BootstrapOutcome::AuthModeUnavailable;
        };

        if !mode.is_single_user() {
            tracing::info!("[Bootstrap] Server mode '{}' needs interactive login", mode.mode);
            return BootstrapOutcome::InteractiveLoginRequired { mode: mode.mode };
        }

        let Some(identity) = mode.auto_login_identity() else {
            tracing::info!("[Bootstrap] Single-user server names no default identity");
            return BootstrapOutcome::NoDefaultIdentity;
        };

        match self.login(server, identity).await {
            Ok(()) => {
                tracing::info!("[Bootstrap] Auto-login succeeded");
                BootstrapOutcome::LoggedIn
            }
            Err(reason) => {
                tracing::warn!("[Bootstrap] Auto-login failed: {}", reason);
                BootstrapOutcome::LoginFailed { reason }
            }
        }
    }

    async fn check_session(&self, server: &ServerConfig) -> bool {
        let mut request = self.client.get(server.endpoint(WHO_AM_I_PATH));
        if let Some(cookie) = self.jar.get_cookie(server.base_url()) {
            request = request.header(COOKIE, cookie);
        }

        match request.send().await {
            Ok(response) => {
                sync_response_cookies(&self.jar, server.base_url(), response.headers()).await;
                let status = response.status().as_u16();
                tracing::debug!("[Bootstrap] who-am-I answered HTTP {}", status);
                status == 200
            }
            Err(e) => {
                tracing::debug!("[Bootstrap] who-am-I failed: {}", e);
                false
            }
        }
    }

    async fn fetch_auth_mode(&self, server: &ServerConfig) -> Option<AuthMode> {
        let response = match self.client.get(server.endpoint(AUTH_MODE_PATH)).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("[Bootstrap] auth-mode failed: {}", e);
                return None;
            }
        };

        if response.status().as_u16() != 200 {
            tracing::debug!("[Bootstrap] auth-mode answered HTTP {}", response.status());
            return None;
        }

        let body = response.text().await.ok()?;
        AuthMode::parse(&body)
    }

    async fn login(&self, server: &ServerConfig, identity: &str) -> std::result::Result<(), String> {
        let response = self
            .client
            .post(server.endpoint(LOGIN_PATH))
            .json(&json!({ "username": identity }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        // Cookies are merged before the status is inspected.
        sync_response_cookies(&self.jar, server.base_url(), response.headers()).await;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            Err(format!("HTTP {}", status))
        }
    }
}
