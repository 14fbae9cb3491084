//! Server endpoint configuration.
//!
//! A [`ServerConfig`] can only be built from input that passes [`is_valid_url`],
//! which is what makes it safe to persist.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, YarnlError};

/// Message shown when the entered server address is rejected.
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL (e.g. https://yarnl.example.com)";

/// Returns true when `input` is a usable server address.
///
/// Blank input is rejected, the scheme must be spelled out as `http://` or
/// `https://`, and the remainder must parse into a URL with a host.
pub fn is_valid_url(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return false;
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

/// Trims surrounding whitespace and any trailing `/`.
///
/// Scheme and case are left alone. Idempotent.
pub fn normalize_url(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}

/// The remote endpoint the shell talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerConfig {
    base_url: String,
}

impl ServerConfig {
    /// Validates and normalizes user input.
    pub fn parse(input: &str) -> Result<Self> {
        if !is_valid_url(input) {
            return Err(YarnlError::validation(INVALID_URL_MESSAGE));
        }
        Ok(Self {
            base_url: normalize_url(input),
        })
    }

    /// Normalized base URL, never ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host component of the base URL, lowercased by the URL parser.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    /// Absolute URL of a server API path such as `/api/auth/me`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Base URL with an in-page fragment, e.g. `https://host#library`.
    pub fn fragment_url(&self, fragment: &str) -> String {
        format!("{}#{}", self.base_url, fragment.trim_start_matches('#'))
    }

    /// Whether `target` points at the same host as this server.
    pub fn is_same_host(&self, target: &str) -> bool {
        let Some(own) = self.host() else {
            return false;
        };
        Url::parse(target)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .is_some_and(|host| host == own)
    }
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_url)
    }
}

impl TryFrom<String> for ServerConfig {
    type Error = YarnlError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ServerConfig> for String {
    fn from(config: ServerConfig) -> Self {
        config.base_url
    }
}
