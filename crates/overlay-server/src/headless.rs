//! In-memory platform collaborators for tests and the headless driver.
//!
//! Each keeps a call log and exposes switches that make the next calls fail.
//! Clones share state.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use overlay_winops::{
    DisplayMetrics, Error, Result,
    headless::{HeadlessRenderHost, HeadlessWindowManager},
};
use parking_lot::Mutex;
use permissions::StaticPermissions;

use crate::platform::{Notification, NotificationManager, Platform, PowerManager, Preferences};

#[derive(Clone, Default)]
pub struct HeadlessPower {
    calls: Arc<Mutex<Vec<String>>>,
    held: Arc<Mutex<HashSet<String>>>,
    fail_acquire: Arc<AtomicBool>,
    fail_release: Arc<AtomicBool>,
}

impl HeadlessPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_acquire(&self, v: bool) {
        self.fail_acquire.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_release(&self, v: bool) {
        self.fail_release.store(v, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    pub fn count(&self, s: &str) -> usize {
        self.calls.lock().iter().filter(|x| *x == s).count()
    }

    fn note(&self, s: String) {
        self.calls.lock().push(s);
    }
}

impl PowerManager for HeadlessPower {
    fn acquire(&self, tag: &str, timeout: Option<Duration>) -> Result<()> {
        match timeout {
            Some(d) => self.note(format!("acquire:{tag}:{}ms", d.as_millis())),
            None => self.note(format!("acquire:{tag}")),
        }
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(Error::Rejected("wake lock refused".into()));
        }
        self.held.lock().insert(tag.to_string());
        Ok(())
    }

    fn release(&self, tag: &str) -> Result<()> {
        self.note(format!("release:{tag}"));
        if self.fail_release.load(Ordering::SeqCst) {
            return Err(Error::Rejected("wake lock release refused".into()));
        }
        self.held.lock().remove(tag);
        Ok(())
    }

    fn is_held(&self, tag: &str) -> bool {
        self.held.lock().contains(tag)
    }
}

#[derive(Clone, Default)]
pub struct HeadlessNotifications {
    calls: Arc<Mutex<Vec<String>>>,
    current: Arc<Mutex<Option<Notification>>>,
    rejected_titles: Arc<Mutex<HashSet<String>>>,
    fail_cancel: Arc<AtomicBool>,
}

impl HeadlessNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any notification posted with this title.
    pub fn reject_title(&self, title: &str) {
        self.rejected_titles.lock().insert(title.to_string());
    }

    pub fn set_fail_cancel(&self, v: bool) {
        self.fail_cancel.store(v, Ordering::SeqCst);
    }

    /// The notification currently shown.
    pub fn current(&self) -> Option<Notification> {
        self.current.lock().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    fn note(&self, s: String) {
        self.calls.lock().push(s);
    }
}

impl NotificationManager for HeadlessNotifications {
    fn ensure_channel(&self, id: &str, _name: &str) -> Result<()> {
        self.note(format!("channel:{id}"));
        Ok(())
    }

    fn post(&self, notification: &Notification) -> Result<()> {
        self.note(format!("post:{}", notification.id));
        if self.rejected_titles.lock().contains(&notification.title) {
            return Err(Error::Rejected(format!(
                "notification '{}' refused",
                notification.title
            )));
        }
        *self.current.lock() = Some(notification.clone());
        Ok(())
    }

    fn cancel(&self, id: i32) -> Result<()> {
        self.note(format!("cancel:{id}"));
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(Error::Rejected("cancel refused".into()));
        }
        let mut cur = self.current.lock();
        if cur.as_ref().is_some_and(|n| n.id == id) {
            *cur = None;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryPreferences {
    bools: Arc<Mutex<HashMap<String, bool>>>,
    strings: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.bools.lock().get(key).copied()
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.bools.lock().insert(key.to_string(), value);
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.strings.lock().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        self.strings
            .lock()
            .insert(key.to_string(), value.to_string());
    }
}

/// A complete headless platform. Keep this value to inspect or steer the
/// collaborators after handing [`HeadlessPlatform::platform`] to a service.
#[derive(Clone)]
pub struct HeadlessPlatform {
    pub windows: HeadlessWindowManager,
    pub render: HeadlessRenderHost,
    pub power: HeadlessPower,
    pub notifications: HeadlessNotifications,
    pub prefs: MemoryPreferences,
    pub permissions: StaticPermissions,
}

impl HeadlessPlatform {
    /// Healthy platform with every permission granted.
    pub fn new(metrics: Option<DisplayMetrics>) -> Self {
        Self {
            windows: HeadlessWindowManager::new(metrics),
            render: HeadlessRenderHost::new(),
            power: HeadlessPower::new(),
            notifications: HeadlessNotifications::new(),
            prefs: MemoryPreferences::new(),
            permissions: StaticPermissions::granted(),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform {
            windows: Arc::new(self.windows.clone()),
            render: Arc::new(self.render.clone()),
            power: Arc::new(self.power.clone()),
            notifications: Arc::new(self.notifications.clone()),
            prefs: Arc::new(self.prefs.clone()),
            permissions: Arc::new(self.permissions.clone()),
        }
    }
}
