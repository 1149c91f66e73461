use crate::{
    Result,
    geom::{DisplayMetrics, Size},
    layout::WindowAttributes,
};

/// Opaque id for a drawable surface produced by the render host.
pub type SurfaceId = u64;

/// Proof that a view is attached to the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowToken(pub u64);

/// Platform window manager. All methods may be called from any thread; an
/// implementation that needs a specific thread marshals internally.
pub trait WindowManager: Send + Sync {
    fn display_metrics(&self) -> Result<DisplayMetrics>;
    fn add_view(&self, surface: SurfaceId, attrs: &WindowAttributes) -> Result<WindowToken>;
    fn update_view_layout(&self, token: WindowToken, attrs: &WindowAttributes) -> Result<()>;
    fn remove_view(&self, token: WindowToken) -> Result<()>;
    /// Whether `token` still refers to an attached view. This can flip to
    /// false at any moment without the caller's involvement.
    fn is_attached(&self, token: WindowToken) -> bool;
    /// Laid-out size of the view, if attached.
    fn measured_size(&self, token: WindowToken) -> Option<Size>;
}

/// External engine that renders overlay content into surfaces.
pub trait RenderHost: Send + Sync {
    /// Whether the engine exists at all.
    fn is_reachable(&self) -> bool;
    fn executor_alive(&self) -> bool;
    fn renderer_alive(&self) -> bool;
    /// Deliver a lifecycle "resumed" notification.
    fn resume(&self) -> Result<()>;
    fn create_surface(&self) -> Result<SurfaceId>;
    fn release_surface(&self, surface: SurfaceId) -> Result<()>;

    /// Reachable with both subsystems responding.
    fn is_valid(&self) -> bool {
        self.executor_alive() && self.renderer_alive()
    }
}
