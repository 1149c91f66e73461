//! Permission checks for the overlay window service.
//!
//! The platform decides whether the process may draw over other applications
//! ("overlay") and whether its accessibility service is enabled. This crate
//! defines the seam the service queries through and a static implementation
//! for headless use.
//!
//! Notes
//! - `overlay_ok()` gates `show`; a missing grant is reported to the caller.
//! - `request_*` open the platform settings flow. Only the overlay request
//!   reports a result, the status after the user returns.
//! - `check_permissions()` returns both as a simple status struct.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Source of permission state.
pub trait PermissionProvider: Send + Sync {
    /// Whether the process may draw overlays.
    fn overlay_ok(&self) -> bool;
    /// Whether the accessibility service is enabled for this process.
    fn accessibility_ok(&self) -> bool;
    /// Open the overlay permission flow and return the resulting status.
    fn request_overlay(&self) -> bool;
    /// Open the accessibility settings flow.
    fn request_accessibility(&self);
}

/// Current permission status for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsStatus {
    /// Overlay ("draw over other apps") permission; `true` if granted.
    pub overlay_ok: bool,
    /// Accessibility service; `true` if enabled.
    pub accessibility_ok: bool,
}

/// Query both permissions. Performs no prompting.
pub fn check_permissions(provider: &dyn PermissionProvider) -> PermissionsStatus {
    PermissionsStatus {
        overlay_ok: provider.overlay_ok(),
        accessibility_ok: provider.accessibility_ok(),
    }
}

/// Permission state held in memory.
///
/// Requests model a user who accepts the dialog when `grant_on_request` is
/// set. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    overlay: Arc<AtomicBool>,
    accessibility: Arc<AtomicBool>,
    grant_on_request: Arc<AtomicBool>,
    accessibility_requests: Arc<AtomicBool>,
}

impl StaticPermissions {
    pub fn new(overlay: bool, accessibility: bool) -> Self {
        let p = Self::default();
        p.set_overlay(overlay);
        p.set_accessibility(accessibility);
        p
    }

    /// Everything granted.
    pub fn granted() -> Self {
        Self::new(true, true)
    }

    pub fn set_overlay(&self, v: bool) {
        self.overlay.store(v, Ordering::SeqCst);
    }

    pub fn set_accessibility(&self, v: bool) {
        self.accessibility.store(v, Ordering::SeqCst);
    }

    pub fn set_grant_on_request(&self, v: bool) {
        self.grant_on_request.store(v, Ordering::SeqCst);
    }

    /// Whether the accessibility settings flow was ever opened.
    pub fn accessibility_requested(&self) -> bool {
        self.accessibility_requests.load(Ordering::SeqCst)
    }
}

impl PermissionProvider for StaticPermissions {
    fn overlay_ok(&self) -> bool {
        self.overlay.load(Ordering::SeqCst)
    }

    fn accessibility_ok(&self) -> bool {
        self.accessibility.load(Ordering::SeqCst)
    }

    fn request_overlay(&self) -> bool {
        if self.grant_on_request.load(Ordering::SeqCst) {
            self.set_overlay(true);
        }
        debug!(granted = self.overlay_ok(), "overlay permission requested");
        self.overlay_ok()
    }

    fn request_accessibility(&self) {
        self.accessibility_requests.store(true, Ordering::SeqCst);
        debug!("accessibility settings opened");
    }
}
