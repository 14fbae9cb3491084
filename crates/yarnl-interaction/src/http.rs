//! Shared client construction and cookie bridging.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::{HeaderMap, SET_COOKIE};
use yarnl_core::config::Timeouts;
use yarnl_core::cookie::CookieJar;
use yarnl_core::{Result, YarnlError};

/// Builds a client with explicit connect and read timeouts.
///
/// Cookies are managed by the shared jar, never by the client itself.
pub fn build_client(timeouts: Timeouts) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeouts.connect())
        .read_timeout(timeouts.read())
        .build()
        .map_err(|e| YarnlError::internal(format!("Failed to build HTTP client: {}", e)))
}

/// Stores every `Set-Cookie` in `headers` under `url`, then flushes the jar once.
///
/// Returns the number of cookies offered to the jar.
pub async fn sync_response_cookies(jar: &Arc<dyn CookieJar>, url: &str, headers: &HeaderMap) -> usize {
    let mut merged = 0;
    for value in headers.get_all(SET_COOKIE) {
        match value.to_str() {
            Ok(set_cookie) => {
                jar.set_cookie(url, set_cookie);
                merged += 1;
            }
            Err(_) => tracing::warn!("[Cookies] Skipping non-ASCII Set-Cookie header"),
        }
    }

    let jar = Arc::clone(jar);
    match tokio::task::spawn_blocking(move || jar.flush()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("[Cookies] Flush failed: {}", e),
        Err(e) => tracing::warn!("[Cookies] Flush task failed: {}", e),
    }

    if merged > 0 {
        tracing::debug!("[Cookies] Merged {} cookies for {}", merged, url);
    }
    merged
}
