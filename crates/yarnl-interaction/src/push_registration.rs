//! Push token persistence and server registration.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::COOKIE;
use serde_json::json;
use yarnl_core::config::Timeouts;
use yarnl_core::cookie::CookieJar;
use yarnl_core::preferences::PreferenceStore;
use yarnl_core::push::PUSH_REGISTER_PATH;
use yarnl_core::{Result, ServerConfig};

use crate::http::build_client;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    /// No usable server URL is stored.
    NoServer,
    /// The jar holds no cookies for the server.
    NoSession,
    Rejected { status: u16 },
    /// The server accepted the token, but a newer one was stored meanwhile.
    Superseded,
    Failed { reason: String },
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }
}

pub struct PushRegistrar {
    client: Client,
    jar: Arc<dyn CookieJar>,
    prefs: Arc<dyn PreferenceStore>,
    platform: String,
}

impl PushRegistrar {
    pub fn new(
        jar: Arc<dyn CookieJar>,
        prefs: Arc<dyn PreferenceStore>,
        timeouts: Timeouts,
        platform: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeouts)?,
            jar,
            prefs,
            platform: platform.into(),
        })
    }

    /// Persists `token`, then tries to register it.
    ///
    /// A token that differs from the stored one clears the registered flag
    /// before any network traffic.
    pub async fn on_token_issued(&self, token: &str) -> RegistrationOutcome {
        match self.prefs.save_push_token(token).await {
            Ok(true) => tracing::info!("[Push] New token stored ({} chars)", token.len()),
            Ok(false) => tracing::debug!("[Push] Token unchanged"),
            Err(e) => {
                tracing::warn!("[Push] Could not store token: {}", e);
                return RegistrationOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }
        self.register_with_server(token).await
    }

    /// Re-runs registration for the stored token, if there is one.
    pub async fn refresh(&self) -> Option<RegistrationOutcome> {
        let token = self.prefs.get_push_token().await?;
        Some(self.on_token_issued(&token).await)
    }

    /// Upserts `token` on the server. Failures leave the flag false and are
    /// retried on the next launch.
    pub async fn register_with_server(&self, token: &str) -> RegistrationOutcome {
        let outcome = self.try_register(token).await;
        match &outcome {
            RegistrationOutcome::Registered => tracing::info!("[Push] Token registered"),
            other => tracing::debug!("[Push] Registration skipped: {:?}", other),
        }
        outcome
    }

    async fn try_register(&self, token: &str) -> RegistrationOutcome {
        let Some(server) = self
            .prefs
            .get_server_url()
            .await
            .and_then(|url| ServerConfig::parse(&url).ok())
        else {
            return RegistrationOutcome::NoServer;
        };

        let Some(cookie) = self.jar.get_cookie(server.base_url()) else {
            return RegistrationOutcome::NoSession;
        };

        let response = match self
            .client
            .post(server.endpoint(PUSH_REGISTER_PATH))
            .header(COOKIE, cookie)
            .json(&json!({ "token": token, "platform": self.platform }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return RegistrationOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return RegistrationOutcome::Rejected {
                status: status.as_u16(),
            };
        }

        match self.prefs.mark_push_registered(token).await {
            Ok(true) => RegistrationOutcome::Registered,
            Ok(false) => RegistrationOutcome::Superseded,
            Err(e) => RegistrationOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}
