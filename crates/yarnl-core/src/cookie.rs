//! Shared cookie jar contract.

use crate::error::Result;

/// A single persistent cookie store shared by native HTTP calls and the
/// embedded view.
///
/// Per-cookie writes are atomic at the jar level; callers never need a
/// multi-cookie transaction. Writes become durable only after [`flush`].
///
/// [`flush`]: CookieJar::flush
pub trait CookieJar: Send + Sync {
    /// `Cookie` header value for a request to `url`, if any cookie applies.
    fn get_cookie(&self, url: &str) -> Option<String>;

    /// Stores one `Set-Cookie` header value received from `url`.
    fn set_cookie(&self, url: &str, set_cookie: &str);

    /// Writes the current jar contents to durable storage.
    fn flush(&self) -> Result<()>;

    /// Drops every cookie that would be sent to `url`.
    fn clear_for_url(&self, url: &str) -> Result<()>;
}
