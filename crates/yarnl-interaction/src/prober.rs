//! Server reachability probe used by setup and settings.

use std::error::Error as _;

use reqwest::Client;
use yarnl_core::config::Timeouts;
use yarnl_core::server::{INVALID_URL_MESSAGE, is_valid_url, normalize_url};
use yarnl_core::Result;

use crate::http::build_client;

/// Result of a single reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    /// Human-readable reason, suitable for showing as-is.
    Error(String),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Clone)]
pub struct ConnectionProber {
    client: Client,
}

impl ConnectionProber {
    pub fn new(timeouts: Timeouts) -> Result<Self> {
        Ok(Self {
            client: build_client(timeouts)?,
        })
    }

    /// Issues one `HEAD` request. 200..=399 is success; there are no retries.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        if !is_valid_url(url) {
            return ProbeOutcome::Error(INVALID_URL_MESSAGE.to_string());
        }
        let target = normalize_url(url);
        tracing::debug!("[Probe] HEAD {}", target);

        match self.client.head(&target).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if (200..400).contains(&status) {
                    tracing::info!("[Probe] {} reachable (HTTP {})", target, status);
                    ProbeOutcome::Success
                } else {
                    tracing::info!("[Probe] {} answered HTTP {}", target, status);
                    ProbeOutcome::Error(format!("Server returned HTTP {}", status))
                }
            }
            Err(e) => {
                let reason = describe_transport_error(&e);
                tracing::info!("[Probe] {} unreachable: {}", target, reason);
                ProbeOutcome::Error(reason)
            }
        }
    }
}

/// Maps a transport failure to the message shown to the user.
fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "Connection timed out".to_string();
    }
    if let Some(detail) = tls_detail(err) {
        return format!("SSL error: {}", detail);
    }
    if err.is_connect() {
        return "Could not connect to server".to_string();
    }
    "Connection failed".to_string()
}

fn tls_detail(err: &reqwest::Error) -> Option<String> {
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        let lower = text.to_ascii_lowercase();
        if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
            return Some(text);
        }
        source = cause.source();
    }
    None
}
