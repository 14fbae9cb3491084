//! Headless stand-ins for the platform collaborators.
//!
//! Everything the shell would do to a real view or OS surface is printed to
//! stdout, one line per call.

use yarnl_core::push::{Notification, Notifier};
use yarnl_core::shortcut::{DynamicShortcut, ShortcutPublisher};
use yarnl_core::view::{ExternalOpener, ViewHost};
use yarnl_core::{Result, YarnlError};

pub struct HeadlessView;

impl ViewHost for HeadlessView {
    fn navigate(&self, url: &str) {
        println!("view: navigate {}", url);
    }

    fn reload(&self) {
        println!("view: reload");
    }

    fn evaluate_script(&self, script: &str) {
        println!("view: evaluate script ({} bytes)", script.len());
    }
}

/// Prints web links; there is no handler for app-store or intent links.
pub struct PrintingOpener;

impl ExternalOpener for PrintingOpener {
    fn open(&self, url: &str) -> Result<()> {
        let scheme = url.split_once(':').map(|(s, _)| s.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http") | Some("https") | Some("mailto") => {
                println!("open externally: {}", url);
                Ok(())
            }
            _ => Err(YarnlError::unhandled_navigation(
                url,
                "no application can handle this link",
            )),
        }
    }
}

pub struct PrintingPublisher;

impl ShortcutPublisher for PrintingPublisher {
    fn set_dynamic_shortcut(&self, shortcut: &DynamicShortcut) -> Result<()> {
        println!(
            "shortcut: {} -> {} ({})",
            shortcut.slot_id,
            shortcut.short_label,
            shortcut.action.kind()
        );
        Ok(())
    }

    fn remove_dynamic_shortcut(&self, slot_id: &str) -> Result<()> {
        println!("shortcut: removed {}", slot_id);
        Ok(())
    }
}

pub struct PrintingNotifier;

impl Notifier for PrintingNotifier {
    fn post(&self, notification: &Notification) -> Result<()> {
        println!(
            "notification [{}]: {} - {}",
            notification.channel_id, notification.title, notification.body
        );
        if let Some(link) = &notification.deep_link_url {
            println!("  tap opens: {}", link);
        }
        Ok(())
    }
}
