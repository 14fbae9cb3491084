//! Single dynamic "recent item" shortcut kept in sync with the page.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::shortcut::action::ShortcutAction;

/// Slot id of the only dynamic shortcut the shell publishes.
pub const RECENT_SHORTCUT_SLOT: &str = "recent_pattern";

/// Label used when the page reports an item without a name.
pub const DEFAULT_RECENT_LABEL: &str = "Recent Pattern";

/// An OS-level dynamic launcher shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicShortcut {
    pub slot_id: String,
    pub short_label: String,
    pub long_label: String,
    pub action: ShortcutAction,
}

/// Platform side of dynamic shortcuts.
pub trait ShortcutPublisher: Send + Sync {
    /// Replaces all dynamic shortcuts with `shortcut`.
    fn set_dynamic_shortcut(&self, shortcut: &DynamicShortcut) -> Result<()>;

    fn remove_dynamic_shortcut(&self, slot_id: &str) -> Result<()>;
}

/// Keeps the recent-item slot pointed at the item the page last reported.
pub struct RecentShortcutSync {
    publisher: Arc<dyn ShortcutPublisher>,
    current: Option<DynamicShortcut>,
}

impl RecentShortcutSync {
    pub fn new(publisher: Arc<dyn ShortcutPublisher>) -> Self {
        Self {
            publisher,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&DynamicShortcut> {
        self.current.as_ref()
    }

    /// Points the slot at `id`. Blank ids are ignored; reporting the same item
    /// twice publishes once.
    pub fn on_recent_item(&mut self, id: &str, label: &str) {
        let id = id.trim();
        if id.is_empty() {
            debug!("[Shortcut] Ignoring recent item without id");
            return;
        }
        let label = match label.trim() {
            "" => DEFAULT_RECENT_LABEL,
            other => other,
        };
        let shortcut = DynamicShortcut {
            slot_id: RECENT_SHORTCUT_SLOT.to_string(),
            short_label: label.to_string(),
            long_label: label.to_string(),
            action: ShortcutAction::Pattern { id: id.to_string() },
        };
        if self.current.as_ref() == Some(&shortcut) {
            return;
        }
        match self.publisher.set_dynamic_shortcut(&shortcut) {
            Ok(()) => {
                debug!("[Shortcut] Recent shortcut now points at pattern {}", id);
                self.current = Some(shortcut);
            }
            Err(e) => warn!("[Shortcut] Failed to publish recent shortcut: {}", e),
        }
    }

    /// Removes the slot, e.g. after the server changed.
    pub fn clear(&mut self) {
        if let Err(e) = self.publisher.remove_dynamic_shortcut(RECENT_SHORTCUT_SLOT) {
            warn!("[Shortcut] Failed to remove recent shortcut: {}", e);
        }
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<DynamicShortcut>>,
        removed: Mutex<Vec<String>>,
    }

    impl ShortcutPublisher for RecordingPublisher {
        fn set_dynamic_shortcut(&self, shortcut: &DynamicShortcut) -> Result<()> {
            self.published.lock().unwrap().push(shortcut.clone());
            Ok(())
        }

        fn remove_dynamic_shortcut(&self, slot_id: &str) -> Result<()> {
            self.removed.lock().unwrap().push(slot_id.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_recent_item_replaces_previous() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut sync = RecentShortcutSync::new(publisher.clone());

        sync.on_recent_item("1", "Hat");
        sync.on_recent_item("2", "Scarf");

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|s| s.slot_id == RECENT_SHORTCUT_SLOT));
        assert_eq!(
            sync.current().map(|s| s.action.clone()),
            Some(ShortcutAction::Pattern { id: "2".to_string() })
        );
    }

    #[test]
    fn test_blank_label_falls_back_and_duplicate_is_skipped() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut sync = RecentShortcutSync::new(publisher.clone());

        sync.on_recent_item("5", "");
        sync.on_recent_item("5", "  ");

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].short_label, DEFAULT_RECENT_LABEL);
    }

    #[test]
    fn test_blank_id_is_ignored() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut sync = RecentShortcutSync::new(publisher.clone());
        sync.on_recent_item(" ", "Hat");
        assert!(publisher.published.lock().unwrap().is_empty());
        assert!(sync.current().is_none());
    }

    #[test]
    fn test_clear_removes_slot() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut sync = RecentShortcutSync::new(publisher.clone());
        sync.on_recent_item("1", "Hat");
        sync.clear();
        assert_eq!(publisher.removed.lock().unwrap().as_slice(), [RECENT_SHORTCUT_SLOT]);
        assert!(sync.current().is_none());
    }
}
