//! Authentication policy snapshot and session-cookie helpers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Server endpoint answering 200 iff the attached session is valid.
pub const WHO_AM_I_PATH: &str = "/api/auth/me";
/// Unauthenticated endpoint describing the server's login policy.
pub const AUTH_MODE_PATH: &str = "/api/auth/mode";
/// Login endpoint taking `{"username": ...}`.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Name of the cookie the server uses for its session.
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// Mode tag of a server with exactly one implicit user.
pub const SINGLE_USER_MODE: &str = "single";

static MODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""mode"\s*:\s*"([^"]+)""#).expect("static regex"));
static IDENTITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""adminUsername"\s*:\s*"([^"]+)""#).expect("static regex"));

/// The server's authentication policy, fetched fresh for one bootstrap decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMode {
    pub mode: String,
    pub default_identity: Option<String>,
}

impl AuthMode {
    /// Extracts the mode tag and default identity from an auth-mode body.
    ///
    /// Matching is by pattern, so extra fields and field order do not matter.
    /// Returns `None` when no mode tag is present.
    pub fn parse(body: &str) -> Option<Self> {
        let mode = MODE_PATTERN.captures(body)?.get(1)?.as_str().to_string();
        let default_identity = IDENTITY_PATTERN
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        Some(Self {
            mode,
            default_identity,
        })
    }

    pub fn is_single_user(&self) -> bool {
        self.mode == SINGLE_USER_MODE
    }

    /// Identity to log in with, only for single-user servers that name one.
    pub fn auto_login_identity(&self) -> Option<&str> {
        if !self.is_single_user() {
            return None;
        }
        self.default_identity.as_deref()
    }
}

/// Whether a `Cookie` header value carries the session cookie.
pub fn has_session_cookie(cookie_header: Option<&str>) -> bool {
    cookie_header.is_some_and(|header| {
        header.split(';').any(|pair| {
            pair.split_once('=')
                .is_some_and(|(name, value)| name.trim() == SESSION_COOKIE_NAME && !value.trim().is_empty())
        })
    })
}
