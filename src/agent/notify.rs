//! Push notifications and notification clicks

use super::OfflineAgent;
use crate::error::{OffcacheError, OffcacheResult};
use crate::fetch::RequestKey;
use crate::host::{Notification, NotificationAction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Action that opens the application
pub const VIEW_ACTION: &str = "view";
/// Action that only dismisses the notification
pub const DISMISS_ACTION: &str = "dismiss";

/// Presentation defaults for push notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationDefaults {
    /// Tag identifying notifications shown by the agent
    pub tag: String,
    /// Title when the payload has none
    pub default_title: String,
    /// Body when the payload has none
    pub default_body: String,
    pub icon: String,
    pub badge: String,
    /// Vibration pattern in milliseconds
    pub vibrate: Vec<u32>,
    /// Label of the "view" action
    pub view_title: String,
    /// Label of the "dismiss" action
    pub dismiss_title: String,
    /// Page opened by the "view" action
    pub open_url: String,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            tag: "earnings-tracker".to_string(),
            default_title: "Earnings Tracker".to_string(),
            default_body: "You have a new earnings milestone!".to_string(),
            icon: "./android-chrome-192x192.png".to_string(),
            badge: "./android-chrome-192x192.png".to_string(),
            vibrate: vec![200, 100, 200],
            view_title: "View Earnings".to_string(),
            dismiss_title: "Dismiss".to_string(),
            open_url: "./".to_string(),
        }
    }
}

/// Decoded push payload: `{title?, body?, data?}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PushPayload {
    pub fn decode(bytes: &[u8]) -> OffcacheResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| OffcacheError::PushPayload(e.to_string()))
    }

    /// Build the notification, filling gaps from `defaults`.
    ///
    /// Empty strings count as missing.
    pub fn into_notification(self, defaults: &NotificationDefaults) -> Notification {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| defaults.default_title.clone());
        let body = self
            .body
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| defaults.default_body.clone());
        let data = self
            .data
            .filter(|d| !d.is_null())
            .unwrap_or_else(|| serde_json::json!({}));

        Notification {
            tag: defaults.tag.clone(),
            title,
            body,
            icon: defaults.icon.clone(),
            badge: defaults.badge.clone(),
            vibrate: defaults.vibrate.clone(),
            data,
            actions: vec![
                NotificationAction {
                    action: VIEW_ACTION.to_string(),
                    title: defaults.view_title.clone(),
                    icon: Some(defaults.icon.clone()),
                },
                NotificationAction {
                    action: DISMISS_ACTION.to_string(),
                    title: defaults.dismiss_title.clone(),
                    icon: None,
                },
            ],
        }
    }
}

/// A click on a notification shown by the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
    pub tag: String,
    /// Chosen action; `None` for a click on the notification body
    pub action: Option<String>,
}

impl NotificationClick {
    pub fn new(tag: impl Into<String>, action: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            action,
        }
    }
}

impl OfflineAgent {
    /// Show a notification for a push message. No payload, no notification.
    pub async fn handle_push(&self, data: Option<Vec<u8>>) -> OffcacheResult<()> {
        let Some(data) = data else {
            debug!("Push without payload, ignoring");
            return Ok(());
        };

        let payload = PushPayload::decode(&data)?;
        let notification = payload.into_notification(&self.config.notifications);
        info!("Showing notification: {}", notification.title);
        self.host.registration.show_notification(notification).await
    }

    /// Close the notification; "view" also opens or focuses the app root
    pub async fn handle_notification_click(&self, click: NotificationClick) -> OffcacheResult<()> {
        self.host.registration.close_notification(&click.tag).await?;

        if click.action.as_deref() != Some(VIEW_ACTION) {
            return Ok(());
        }

        let root = self.config.scope.resolve(&self.config.notifications.open_url)?;
        let root_key = RequestKey::from_url(&root);
        let clients = self.host.clients.match_all().await?;
        let existing = clients.iter().find(|client| {
            self.config
                .scope
                .key_for(&client.url)
                .is_ok_and(|key| key == root_key)
        });

        match existing {
            Some(client) => {
                debug!("Focusing existing client {}", client.id);
                self.host.clients.focus(client).await
            }
            None => {
                info!("Opening {}", root);
                self.host.clients.open_window(root.as_str()).await.map(|_| ())
            }
        }
    }
}
