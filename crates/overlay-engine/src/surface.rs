//! The attached overlay window slot.
//!
//! At most one [`WindowHandle`] exists at a time. Every read or write takes the
//! slot lock and re-checks token liveness under it, so a concurrent `detach`
//! or a platform-side revocation turns the operation into a no-op.

use std::sync::Arc;

use overlay_winops::{
    DisplayMetrics, RenderHost, Size, SurfaceId, WindowAttributes, WindowManager, WindowToken,
};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// An attached overlay window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowHandle {
    pub token: WindowToken,
    pub surface: SurfaceId,
    /// Last attributes successfully applied.
    pub attrs: WindowAttributes,
    /// Display bounds captured at attach time.
    pub display: DisplayMetrics,
}

/// Owner of the overlay window handle.
#[derive(Clone)]
pub struct Surface {
    wm: Arc<dyn WindowManager>,
    host: Arc<dyn RenderHost>,
    slot: Arc<Mutex<Option<WindowHandle>>>,
    fallback: DisplayMetrics,
}

impl Surface {
    pub fn new(
        wm: Arc<dyn WindowManager>,
        host: Arc<dyn RenderHost>,
        fallback: DisplayMetrics,
    ) -> Self {
        Self {
            wm,
            host,
            slot: Arc::new(Mutex::new(None)),
            fallback,
        }
    }

    pub fn render_host(&self) -> &Arc<dyn RenderHost> {
        &self.host
    }

    /// Current display metrics, or the fallback when the platform cannot
    /// report them.
    pub fn display_metrics(&self) -> DisplayMetrics {
        match self.wm.display_metrics() {
            Ok(m) => m,
            Err(err) => {
                warn!(?err, "display metrics unavailable, using fallback");
                self.fallback
            }
        }
    }

    /// Attach a new window. Any existing handle is torn down first.
    pub fn attach(&self, attrs: WindowAttributes, display: DisplayMetrics) -> Result<WindowHandle> {
        let mut slot = self.slot.lock();
        if let Some(stale) = slot.take() {
            debug!(token = ?stale.token, "replacing existing overlay window");
            self.teardown(stale);
        }
        let surface = self.host.create_surface().map_err(Error::AttachFailed)?;
        let token = match self.wm.add_view(surface, &attrs) {
            Ok(t) => t,
            Err(err) => {
                if let Err(e) = self.host.release_surface(surface) {
                    warn!(?e, surface, "release after failed attach");
                }
                return Err(Error::AttachFailed(err));
            }
        };
        let handle = WindowHandle {
            token,
            surface,
            attrs,
            display,
        };
        *slot = Some(handle);
        debug!(?token, surface, "overlay window attached");
        Ok(handle)
    }

    /// Detach the window if one is held. Returns whether a handle existed.
    pub fn detach(&self) -> bool {
        let taken = self.slot.lock().take();
        match taken {
            Some(handle) => {
                self.teardown(handle);
                true
            }
            None => false,
        }
    }

    /// Whether a handle is held and its token is still attached.
    pub fn is_live(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .is_some_and(|h| self.wm.is_attached(h.token))
    }

    /// Copy of the live handle.
    pub fn handle(&self) -> Option<WindowHandle> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|h| self.wm.is_attached(h.token))
            .copied()
    }

    /// Laid-out size of the live window.
    pub fn measured_size(&self) -> Option<Size> {
        let handle = self.handle()?;
        self.wm.measured_size(handle.token)
    }

    /// Apply `f` to the current attributes and push the result to the window
    /// manager.
    ///
    /// Returns `Ok(None)` when nothing is attached. A token found stale is
    /// released and also reported as `Ok(None)`. A failed update releases the
    /// window and returns [`Error::LayoutMutationFailed`].
    pub fn mutate<F>(&self, f: F) -> Result<Option<WindowAttributes>>
    where
        F: FnOnce(WindowAttributes) -> WindowAttributes,
    {
        let mut slot = self.slot.lock();
        let Some(handle) = *slot else {
            return Ok(None);
        };
        if !self.wm.is_attached(handle.token) {
            debug!(token = ?handle.token, "overlay window gone, releasing");
            *slot = None;
            self.teardown(handle);
            return Ok(None);
        }
        let next = f(handle.attrs);
        match self.wm.update_view_layout(handle.token, &next) {
            Ok(()) => {
                *slot = Some(WindowHandle {
                    attrs: next,
                    ..handle
                });
                Ok(Some(next))
            }
            Err(err) => {
                warn!(?err, token = ?handle.token, "layout update failed, releasing window");
                *slot = None;
                self.teardown(handle);
                Err(Error::LayoutMutationFailed(err))
            }
        }
    }

    /// Release the render surface, then the window-manager view. Either may
    /// already be gone.
    fn teardown(&self, handle: WindowHandle) {
        if let Err(err) = self.host.release_surface(handle.surface) {
            warn!(?err, surface = handle.surface, "release render surface");
        }
        if let Err(err) = self.wm.remove_view(handle.token) {
            debug!(?err, token = ?handle.token, "remove view");
        }
    }
}
