//! Deep-link and app-shortcut dispatch.

pub mod action;
pub mod dispatcher;
pub mod recent;

pub use action::{Delivery, LaunchSignal, ShortcutAction};
pub use dispatcher::{DispatchCommand, DispatchState, ShortcutDispatcher};
pub use recent::{
    DEFAULT_RECENT_LABEL, DynamicShortcut, RECENT_SHORTCUT_SLOT, RecentShortcutSync,
    ShortcutPublisher,
};
