//! Preference domain model.
//!
//! Everything the shell persists is a scalar in this struct.

use serde::{Deserialize, Serialize};

/// Shell preferences that persist across restarts.
///
/// # File Location
///
/// - Linux: `~/.config/yarnl/preferences.toml`
/// - macOS: `~/Library/Application Support/yarnl/preferences.toml`
/// - Windows: `%APPDATA%\yarnl\preferences.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Normalized base URL of the configured server.
    /// None until the first successful setup probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Last push token issued by the platform push service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,

    /// Whether `push_token` was accepted by the server (2xx).
    #[serde(default)]
    pub push_registered: bool,

    /// User's notification opt-in.
    #[serde(default)]
    pub notifications_enabled: bool,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new push token.
    ///
    /// Returns true when the token differs from the previous one, in which
    /// case the registered flag is reset.
    pub fn replace_push_token(&mut self, token: &str) -> bool {
        let changed = self.push_token.as_deref() != Some(token);
        self.push_token = Some(token.to_string());
        if changed {
            self.push_registered = false;
        }
        changed
    }

    /// Sets the registered flag, but only while `token` is still the stored
    /// token. Returns whether the flag now belongs to `token`.
    pub fn mark_registered(&mut self, token: &str) -> bool {
        if self.push_token.as_deref() != Some(token) {
            return false;
        }
        self.push_registered = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let prefs = Preferences::new();
        assert!(prefs.server_url.is_none());
        assert!(prefs.push_token.is_none());
        assert!(!prefs.push_registered);
        assert!(!prefs.notifications_enabled);
    }

    #[test]
    fn test_replace_push_token_resets_flag_on_change() {
        let mut prefs = Preferences::new();
        assert!(prefs.replace_push_token("a"));
        prefs.push_registered = true;

        assert!(!prefs.replace_push_token("a"));
        assert!(prefs.push_registered);

        assert!(prefs.replace_push_token("b"));
        assert!(!prefs.push_registered);
        assert_eq!(prefs.push_token.as_deref(), Some("b"));
    }

    #[test]
    fn test_mark_registered_ignores_stale_token() {
        let mut prefs = Preferences::new();
        prefs.replace_push_token("old");
        prefs.replace_push_token("new");

        assert!(!prefs.mark_registered("old"));
        assert!(!prefs.push_registered);

        assert!(prefs.mark_registered("new"));
        assert!(prefs.push_registered);
    }

    #[test]
    fn test_toml_omits_unset_fields() {
        let text = toml::to_string(&Preferences::new()).unwrap();
        assert!(!text.contains("server_url"));
        let back: Preferences = toml::from_str(&text).unwrap();
        assert_eq!(back, Preferences::new());
    }
}
