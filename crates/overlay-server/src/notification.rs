//! Persistent foreground notification.

use std::sync::Arc;

use config::{NotificationVisibility, OverlayConfig};
use tracing::{debug, error, warn};

use crate::platform::{Notification, NotificationManager};

/// Fixed id of the service notification.
pub const NOTIFICATION_ID: i32 = 4579;
/// Channel the notification is posted on.
pub const CHANNEL_ID: &str = "Overlay Channel";
/// Human-readable channel name.
pub const CHANNEL_NAME: &str = "Foreground Service Channel";
pub const DEFAULT_TITLE: &str = "Overlay Running";
pub const DEFAULT_BODY: &str = "Tap to return to app";

impl Notification {
    /// Notification text for an overlay configuration. Missing text falls
    /// back to the defaults.
    pub fn for_config(config: &OverlayConfig) -> Self {
        let body = if config.body.is_empty() {
            DEFAULT_BODY.to_string()
        } else {
            config.body.clone()
        };
        Self {
            id: NOTIFICATION_ID,
            channel: CHANNEL_ID.to_string(),
            title: config
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body,
            visibility: config.notification_visibility,
        }
    }

    /// Plain notification posted when the configured one is rejected.
    pub fn fallback() -> Self {
        Self {
            id: NOTIFICATION_ID,
            channel: CHANNEL_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
            visibility: NotificationVisibility::default(),
        }
    }
}

/// Posts and cancels the service notification.
#[derive(Clone)]
pub struct ForegroundNotice {
    mgr: Arc<dyn NotificationManager>,
}

impl ForegroundNotice {
    pub fn new(mgr: Arc<dyn NotificationManager>) -> Self {
        Self { mgr }
    }

    /// Post the notification for `config`, retrying once with the fallback
    /// text. Returns the notification that was accepted, if any.
    pub fn post(&self, config: &OverlayConfig) -> Option<Notification> {
        if let Err(err) = self.mgr.ensure_channel(CHANNEL_ID, CHANNEL_NAME) {
            warn!(?err, "notification channel setup failed");
        }
        let wanted = Notification::for_config(config);
        match self.mgr.post(&wanted) {
            Ok(()) => {
                debug!(title = %wanted.title, "notification posted");
                return Some(wanted);
            }
            Err(err) => warn!(?err, "error creating notification, using fallback"),
        }
        let fallback = Notification::fallback();
        match self.mgr.post(&fallback) {
            Ok(()) => Some(fallback),
            Err(err) => {
                error!(?err, "fallback notification rejected");
                None
            }
        }
    }

    pub fn cancel(&self) {
        if let Err(err) = self.mgr.cancel(NOTIFICATION_ID) {
            warn!(?err, "error cancelling notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessNotifications;

    #[test]
    fn configured_text_is_used() {
        let mgr = HeadlessNotifications::new();
        let notice = ForegroundNotice::new(Arc::new(mgr.clone()));
        let cfg = OverlayConfig {
            title: Some("Chat head".into()),
            body: "2 unread".into(),
            notification_visibility: NotificationVisibility::Public,
            ..OverlayConfig::default()
        };
        let posted = notice.post(&cfg).unwrap();
        assert_eq!(posted.title, "Chat head");
        assert_eq!(posted.body, "2 unread");
        assert_eq!(posted.id, NOTIFICATION_ID);
        assert_eq!(mgr.current(), Some(posted));
        assert!(mgr.calls_contains("channel:Overlay Channel"));
    }

    #[test]
    fn missing_text_uses_defaults() {
        let n = Notification::for_config(&OverlayConfig::default());
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.body, DEFAULT_BODY);
        assert_eq!(n.visibility, NotificationVisibility::Private);
    }

    #[test]
    fn rejected_post_falls_back() {
        let mgr = HeadlessNotifications::new();
        mgr.reject_title("bad");
        let notice = ForegroundNotice::new(Arc::new(mgr.clone()));
        let cfg = OverlayConfig {
            title: Some("bad".into()),
            ..OverlayConfig::default()
        };
        assert_eq!(notice.post(&cfg), Some(Notification::fallback()));
        assert_eq!(mgr.current().unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn cancel_clears() {
        let mgr = HeadlessNotifications::new();
        let notice = ForegroundNotice::new(Arc::new(mgr.clone()));
        notice.post(&OverlayConfig::default());
        notice.cancel();
        assert_eq!(mgr.current(), None);
        notice.cancel();
    }
}
