//! Platform collaborators the service drives besides the window manager.

use std::{sync::Arc, time::Duration};

use config::NotificationVisibility;
use overlay_winops::{RenderHost, Result, WindowManager};
use permissions::PermissionProvider;
use serde::{Deserialize, Serialize};

/// Preference key: restart the overlay after a device boot.
pub const RESTART_ON_BOOT_KEY: &str = "restart_on_boot";

/// Preference key: cached accessibility event payload.
pub const ACCESSIBILITY_NODE_KEY: &str = "ACCESSIBILITY_NODE";

/// Partial wake locks, keyed by tag.
pub trait PowerManager: Send + Sync {
    /// Acquire the lock for `tag`. With a timeout the platform releases it on
    /// its own after that long.
    fn acquire(&self, tag: &str, timeout: Option<Duration>) -> Result<()>;
    fn release(&self, tag: &str) -> Result<()>;
    fn is_held(&self, tag: &str) -> bool;
}

/// A persistent notification shown while the service runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i32,
    pub channel: String,
    pub title: String,
    pub body: String,
    pub visibility: NotificationVisibility,
}

/// Foreground notification sink.
pub trait NotificationManager: Send + Sync {
    /// Create the channel if it does not exist yet.
    fn ensure_channel(&self, id: &str, name: &str) -> Result<()>;
    /// Post or replace the notification with `notification.id`.
    fn post(&self, notification: &Notification) -> Result<()>;
    fn cancel(&self, id: i32) -> Result<()>;
}

/// Small persisted key-value store.
pub trait Preferences: Send + Sync {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&self, key: &str, value: bool);
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&self, key: &str, value: &str);
}

/// Everything the service needs from the host platform.
#[derive(Clone)]
pub struct Platform {
    pub windows: Arc<dyn WindowManager>,
    pub render: Arc<dyn RenderHost>,
    pub power: Arc<dyn PowerManager>,
    pub notifications: Arc<dyn NotificationManager>,
    pub prefs: Arc<dyn Preferences>,
    pub permissions: Arc<dyn PermissionProvider>,
}
