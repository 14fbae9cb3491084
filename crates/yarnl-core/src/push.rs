//! Inbound push payloads and the notification collaborator.

use std::collections::HashMap;

use crate::error::Result;

/// Server endpoint that upserts a device push token.
pub const PUSH_REGISTER_PATH: &str = "/api/fcm/register";

/// Notification channel every server notification is posted on.
pub const NOTIFICATION_CHANNEL_ID: &str = "yarnl_notifications";

const DEFAULT_TITLE: &str = "Yarnl";

/// Data fields of an inbound push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub kind: Option<String>,
    pub url: Option<String>,
}

impl PushPayload {
    /// Builds a payload from a push data map, falling back to the
    /// platform-rendered notification title/body when the data omits them.
    pub fn from_data(
        data: &HashMap<String, String>,
        fallback_title: Option<&str>,
        fallback_body: Option<&str>,
    ) -> Self {
        let title = data
            .get("title")
            .map(String::as_str)
            .or(fallback_title)
            .unwrap_or(DEFAULT_TITLE)
            .to_string();
        let body = data
            .get("body")
            .map(String::as_str)
            .or(fallback_body)
            .unwrap_or_default()
            .to_string();
        Self {
            title,
            body,
            kind: data.get("type").cloned(),
            url: data.get("url").cloned().filter(|u| !u.trim().is_empty()),
        }
    }
}

/// A notification ready to be posted by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub kind: Option<String>,
    /// Delivered back to the shell as the `deep_link_url` launch extra on tap.
    pub deep_link_url: Option<String>,
}

impl From<PushPayload> for Notification {
    fn from(payload: PushPayload) -> Self {
        Self {
            channel_id: NOTIFICATION_CHANNEL_ID.to_string(),
            title: payload.title,
            body: payload.body,
            kind: payload.kind,
            deep_link_url: payload.url,
        }
    }
}

/// Posts notifications on the platform.
pub trait Notifier: Send + Sync {
    fn post(&self, notification: &Notification) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_payload_defaults() {
        let payload = PushPayload::from_data(&HashMap::new(), None, None);
        assert_eq!(payload.title, "Yarnl");
        assert_eq!(payload.body, "");
        assert!(payload.kind.is_none());
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_payload_prefers_data_over_fallback() {
        let payload = PushPayload::from_data(
            &data(&[("title", "Row counter"), ("type", "reminder"), ("url", "https://y/#current")]),
            Some("ignored"),
            Some("Keep going"),
        );
        assert_eq!(payload.title, "Row counter");
        assert_eq!(payload.body, "Keep going");
        assert_eq!(payload.kind.as_deref(), Some("reminder"));

        let notification = Notification::from(payload);
        assert_eq!(notification.channel_id, NOTIFICATION_CHANNEL_ID);
        assert_eq!(notification.deep_link_url.as_deref(), Some("https://y/#current"));
    }
}
