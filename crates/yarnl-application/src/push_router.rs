//! Turns inbound push payloads into notifications.

use std::collections::HashMap;
use std::sync::Arc;

use yarnl_core::Result;
use yarnl_core::push::{Notification, Notifier, PushPayload};
use yarnl_core::shortcut::LaunchSignal;

pub struct PushMessageRouter {
    notifier: Arc<dyn Notifier>,
}

impl PushMessageRouter {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Posts a notification for one payload.
    ///
    /// `fallback_title`/`fallback_body` come from the platform's display
    /// block and are used when the data map lacks them.
    pub fn route(
        &self,
        data: &HashMap<String, String>,
        fallback_title: Option<&str>,
        fallback_body: Option<&str>,
    ) -> Result<Notification> {
        let payload = PushPayload::from_data(data, fallback_title, fallback_body);
        let notification = Notification::from(payload);
        tracing::info!(
            "[Push] Posting notification (type: {})",
            notification.kind.as_deref().unwrap_or("none")
        );
        self.notifier.post(&notification)?;
        Ok(notification)
    }

    /// Launch signal produced when the user taps `notification`.
    pub fn tap_signal(notification: &Notification) -> LaunchSignal {
        LaunchSignal {
            deep_link_url: notification.deep_link_url.clone(),
            ..LaunchSignal::default()
        }
    }
}
