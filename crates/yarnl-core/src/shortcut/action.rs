//! Shortcut actions and the launch signals that carry them.

use serde::{Deserialize, Serialize};

use crate::server::ServerConfig;

/// Launch extra naming the shortcut kind.
pub const EXTRA_SHORTCUT_ACTION: &str = "shortcut_action";
/// Launch extra carrying the pattern identifier for `pattern` shortcuts.
pub const EXTRA_PATTERN_ID: &str = "pattern_id";
/// Launch extra carrying a notification's deep link.
pub const EXTRA_DEEP_LINK_URL: &str = "deep_link_url";

/// A deep-link or shortcut request waiting to reach the hosted page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShortcutAction {
    Library,
    Current,
    Upload,
    Pattern { id: String },
}

/// How an action reaches the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The URL fragment fully encodes the destination.
    DirectNavigation,
    /// The page has to perform it and call back.
    PageAcknowledged,
}

impl ShortcutAction {
    /// Builds an action from launch extras.
    ///
    /// Unknown kinds and `pattern` without a non-blank id yield `None`; the
    /// whole signal is then discarded.
    pub fn from_extras(kind: Option<&str>, pattern_id: Option<&str>) -> Option<Self> {
        match kind?.trim() {
            "library" => Some(Self::Library),
            "current" => Some(Self::Current),
            "upload" => Some(Self::Upload),
            "pattern" => {
                let id = pattern_id.map(str::trim).filter(|id| !id.is_empty())?;
                Some(Self::Pattern { id: id.to_string() })
            }
            _ => None,
        }
    }

    /// Launch-extra spelling of the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Current => "current",
            Self::Upload => "upload",
            Self::Pattern { .. } => "pattern",
        }
    }

    pub fn delivery(&self) -> Delivery {
        match self {
            Self::Upload => Delivery::PageAcknowledged,
            Self::Library | Self::Current | Self::Pattern { .. } => Delivery::DirectNavigation,
        }
    }

    /// URL fragment for direct-navigation kinds.
    pub fn fragment(&self) -> Option<String> {
        match self {
            Self::Library => Some("library".to_string()),
            Self::Current => Some("current".to_string()),
            Self::Pattern { id } => Some(format!("pattern/{}", id)),
            Self::Upload => None,
        }
    }

    /// Navigation target for direct-navigation kinds.
    pub fn target_url(&self, server: &ServerConfig) -> Option<String> {
        self.fragment().map(|fragment| server.fragment_url(&fragment))
    }
}

/// What the OS handed us on cold start or re-entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSignal {
    pub shortcut_action: Option<String>,
    pub pattern_id: Option<String>,
    pub deep_link_url: Option<String>,
}

impl LaunchSignal {
    /// Reads the known extras out of a key/value bag.
    pub fn from_extras<'a, I>(extras: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut signal = Self::default();
        for (key, value) in extras {
            match key {
                EXTRA_SHORTCUT_ACTION => signal.shortcut_action = Some(value.to_string()),
                EXTRA_PATTERN_ID => signal.pattern_id = Some(value.to_string()),
                EXTRA_DEEP_LINK_URL => signal.deep_link_url = Some(value.to_string()),
                _ => {}
            }
        }
        signal
    }

    pub fn shortcut(&self) -> Option<ShortcutAction> {
        ShortcutAction::from_extras(self.shortcut_action.as_deref(), self.pattern_id.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.shortcut_action.is_none() && self.deep_link_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extras_known_kinds() {
        assert_eq!(ShortcutAction::from_extras(Some("library"), None), Some(ShortcutAction::Library));
        assert_eq!(ShortcutAction::from_extras(Some("current"), None), Some(ShortcutAction::Current));
        assert_eq!(ShortcutAction::from_extras(Some("upload"), None), Some(ShortcutAction::Upload));
        assert_eq!(
            ShortcutAction::from_extras(Some("pattern"), Some("42")),
            Some(ShortcutAction::Pattern { id: "42".to_string() })
        );
    }

    #[test]
    fn test_pattern_without_id_is_discarded() {
        assert_eq!(ShortcutAction::from_extras(Some("pattern"), None), None);
        assert_eq!(ShortcutAction::from_extras(Some("pattern"), Some("  ")), None);
    }

    #[test]
    fn test_unknown_or_missing_kind() {
        assert_eq!(ShortcutAction::from_extras(Some("settings"), None), None);
        assert_eq!(ShortcutAction::from_extras(None, Some("42")), None);
    }

    #[test]
    fn test_fragments_and_delivery() {
        let server = ServerConfig::parse("https://y.example").unwrap();
        assert_eq!(
            ShortcutAction::Library.target_url(&server).as_deref(),
            Some("https://y.example#library")
        );
        assert_eq!(
            ShortcutAction::Pattern { id: "7".to_string() }.target_url(&server).as_deref(),
            Some("https://y.example#pattern/7")
        );
        assert_eq!(ShortcutAction::Upload.target_url(&server), None);
        assert_eq!(ShortcutAction::Upload.delivery(), Delivery::PageAcknowledged);
        assert_eq!(ShortcutAction::Current.delivery(), Delivery::DirectNavigation);
    }

    #[test]
    fn test_launch_signal_from_extras() {
        let signal = LaunchSignal::from_extras([
            ("shortcut_action", "pattern"),
            ("pattern_id", "9"),
            ("unrelated", "x"),
        ]);
        assert_eq!(signal.shortcut(), Some(ShortcutAction::Pattern { id: "9".to_string() }));
        assert!(!signal.is_empty());
        assert!(LaunchSignal::default().is_empty());
    }
}
