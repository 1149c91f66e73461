//! In-process window manager and render host.
//!
//! Used by tests and by the `overlayctl` driver. Both types are cheap to clone;
//! clones share state, so a test can keep one handle for inspection and
//! failure injection while the engine owns another.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    error::{Error, Result},
    geom::{DisplayMetrics, Frame, Size},
    layout::WindowAttributes,
    ops::{RenderHost, SurfaceId, WindowManager, WindowToken},
};

/// One attached view.
#[derive(Debug, Clone, Copy)]
struct View {
    surface: SurfaceId,
    attrs: WindowAttributes,
}

/// Window manager that keeps attached views in memory.
#[derive(Clone)]
pub struct HeadlessWindowManager {
    calls: Arc<Mutex<Vec<String>>>,
    metrics: Arc<Mutex<Option<DisplayMetrics>>>,
    views: Arc<Mutex<HashMap<WindowToken, View>>>,
    layouts: Arc<Mutex<Vec<(WindowToken, WindowAttributes)>>>,
    content: Arc<Mutex<Size>>,
    next_token: Arc<AtomicU64>,
    fail_add: Arc<AtomicBool>,
    fail_update: Arc<AtomicBool>,
    fail_remove: Arc<AtomicBool>,
}

impl HeadlessWindowManager {
    /// Create a window manager for a display. `None` simulates a platform
    /// that cannot report display metrics.
    pub fn new(metrics: Option<DisplayMetrics>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            metrics: Arc::new(Mutex::new(metrics)),
            views: Arc::new(Mutex::new(HashMap::new())),
            layouts: Arc::new(Mutex::new(Vec::new())),
            content: Arc::new(Mutex::new(Size {
                width: 0,
                height: 0,
            })),
            next_token: Arc::new(AtomicU64::new(1)),
            fail_add: Arc::new(AtomicBool::new(false)),
            fail_update: Arc::new(AtomicBool::new(false)),
            fail_remove: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_display_metrics(&self, metrics: Option<DisplayMetrics>) {
        *self.metrics.lock() = metrics;
    }

    /// Size the content reports when a dimension wraps its content.
    pub fn set_content_size(&self, size: Size) {
        *self.content.lock() = size;
    }

    pub fn set_fail_add(&self, v: bool) {
        self.fail_add.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_update(&self, v: bool) {
        self.fail_update.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_remove(&self, v: bool) {
        self.fail_remove.store(v, Ordering::SeqCst);
    }

    /// Detach a view behind the caller's back, as the platform may do.
    pub fn revoke(&self, token: WindowToken) {
        self.note("revoke");
        self.views.lock().remove(&token);
    }

    /// Token of the single attached view, if any.
    pub fn live_token(&self) -> Option<WindowToken> {
        self.views.lock().keys().next().copied()
    }

    pub fn attached_count(&self) -> usize {
        self.views.lock().len()
    }

    pub fn attrs(&self, token: WindowToken) -> Option<WindowAttributes> {
        self.views.lock().get(&token).map(|v| v.attrs)
    }

    pub fn surface_of(&self, token: WindowToken) -> Option<SurfaceId> {
        self.views.lock().get(&token).map(|v| v.surface)
    }

    /// Absolute frame of an attached view.
    pub fn frame(&self, token: WindowToken) -> Option<Frame> {
        let attrs = self.attrs(token)?;
        let metrics = (*self.metrics.lock())?;
        Some(attrs.resolve_frame(&metrics, *self.content.lock()))
    }

    /// Every layout applied through `update_view_layout`, in order.
    pub fn layout_history(&self) -> Vec<(WindowToken, WindowAttributes)> {
        self.layouts.lock().clone()
    }

    pub fn clear_layout_history(&self) {
        self.layouts.lock().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }

    fn issued(&self, token: WindowToken) -> bool {
        token.0 > 0 && token.0 < self.next_token.load(Ordering::SeqCst)
    }
}

impl WindowManager for HeadlessWindowManager {
    fn display_metrics(&self) -> Result<DisplayMetrics> {
        (*self.metrics.lock()).ok_or(Error::DisplayUnavailable)
    }

    fn add_view(&self, surface: SurfaceId, attrs: &WindowAttributes) -> Result<WindowToken> {
        self.note("add_view");
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Error::Rejected("add_view refused".into()));
        }
        let token = WindowToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.views.lock().insert(
            token,
            View {
                surface,
                attrs: *attrs,
            },
        );
        debug!(?token, surface, "headless: view added");
        Ok(token)
    }

    fn update_view_layout(&self, token: WindowToken, attrs: &WindowAttributes) -> Result<()> {
        self.note("update_view_layout");
        if !self.issued(token) {
            return Err(Error::BadToken);
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Error::Rejected("update_view_layout refused".into()));
        }
        let mut views = self.views.lock();
        let view = views.get_mut(&token).ok_or(Error::WindowGone)?;
        view.attrs = *attrs;
        self.layouts.lock().push((token, *attrs));
        Ok(())
    }

    fn remove_view(&self, token: WindowToken) -> Result<()> {
        self.note("remove_view");
        if !self.issued(token) {
            return Err(Error::BadToken);
        }
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Error::Rejected("remove_view refused".into()));
        }
        match self.views.lock().remove(&token) {
            Some(_) => Ok(()),
            None => Err(Error::WindowGone),
        }
    }

    fn is_attached(&self, token: WindowToken) -> bool {
        self.views.lock().contains_key(&token)
    }

    fn measured_size(&self, token: WindowToken) -> Option<Size> {
        let attrs = self.attrs(token)?;
        let metrics = (*self.metrics.lock())?;
        Some(attrs.resolve_size(&metrics, *self.content.lock()))
    }
}

/// Render host whose health is controlled by the test.
#[derive(Clone)]
pub struct HeadlessRenderHost {
    calls: Arc<Mutex<Vec<String>>>,
    surfaces: Arc<Mutex<HashSet<SurfaceId>>>,
    next_surface: Arc<AtomicU64>,
    reachable: Arc<AtomicBool>,
    executor: Arc<AtomicBool>,
    renderer: Arc<AtomicBool>,
    fail_resume: Arc<AtomicBool>,
    fail_create: Arc<AtomicBool>,
}

impl Default for HeadlessRenderHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderHost {
    /// A reachable, healthy host.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            surfaces: Arc::new(Mutex::new(HashSet::new())),
            next_surface: Arc::new(AtomicU64::new(1)),
            reachable: Arc::new(AtomicBool::new(true)),
            executor: Arc::new(AtomicBool::new(true)),
            renderer: Arc::new(AtomicBool::new(true)),
            fail_resume: Arc::new(AtomicBool::new(false)),
            fail_create: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_reachable(&self, v: bool) {
        self.reachable.store(v, Ordering::SeqCst);
    }

    pub fn set_executor_alive(&self, v: bool) {
        self.executor.store(v, Ordering::SeqCst);
    }

    pub fn set_renderer_alive(&self, v: bool) {
        self.renderer.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_resume(&self, v: bool) {
        self.fail_resume.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, v: bool) {
        self.fail_create.store(v, Ordering::SeqCst);
    }

    /// Surfaces created and not yet released.
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.lock().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }
}

impl RenderHost for HeadlessRenderHost {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn executor_alive(&self) -> bool {
        self.executor.load(Ordering::SeqCst)
    }

    fn renderer_alive(&self) -> bool {
        self.renderer.load(Ordering::SeqCst)
    }

    fn resume(&self) -> Result<()> {
        self.note("resume");
        if self.fail_resume.load(Ordering::SeqCst) {
            return Err(Error::Rejected("resume refused".into()));
        }
        Ok(())
    }

    fn create_surface(&self) -> Result<SurfaceId> {
        self.note("create_surface");
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::SurfaceCreate);
        }
        let id = self.next_surface.fetch_add(1, Ordering::SeqCst);
        self.surfaces.lock().insert(id);
        Ok(id)
    }

    fn release_surface(&self, surface: SurfaceId) -> Result<()> {
        self.note("release_surface");
        if self.surfaces.lock().remove(&surface) {
            Ok(())
        } else {
            Err(Error::Rejected(format!("surface {surface} not live")))
        }
    }
}

#[cfg(test)]
mod tests {
    use config::OverlayConfig;

    use super::*;
    use crate::layout::LayoutParamsBuilder;

    fn metrics() -> DisplayMetrics {
        DisplayMetrics {
            width_px: 1000,
            height_px: 2000,
            density: 1.0,
            status_bar_px: 25,
        }
    }

    #[test]
    fn revoked_token_reports_gone() {
        let wm = HeadlessWindowManager::new(Some(metrics()));
        let attrs = LayoutParamsBuilder::build(&OverlayConfig::default(), &metrics());
        let token = wm.add_view(7, &attrs).unwrap();
        assert!(wm.is_attached(token));
        wm.revoke(token);
        assert!(!wm.is_attached(token));
        assert_eq!(wm.update_view_layout(token, &attrs), Err(Error::WindowGone));
        assert_eq!(wm.remove_view(token), Err(Error::WindowGone));
        assert_eq!(
            wm.update_view_layout(WindowToken(99), &attrs),
            Err(Error::BadToken)
        );
    }

    #[test]
    fn missing_metrics_is_display_unavailable() {
        let wm = HeadlessWindowManager::new(None);
        assert_eq!(wm.display_metrics(), Err(Error::DisplayUnavailable));
    }

    #[test]
    fn render_host_tracks_surfaces() {
        let host = HeadlessRenderHost::new();
        let s = host.create_surface().unwrap();
        assert_eq!(host.live_surfaces(), 1);
        host.release_surface(s).unwrap();
        assert!(host.release_surface(s).is_err());
        host.set_renderer_alive(false);
        assert!(host.is_reachable());
        assert!(!host.is_valid());
    }
}
