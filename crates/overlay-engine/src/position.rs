//! Position queries and window-attribute mutators.
//!
//! All mutators report "no overlay attached" as `Ok(false)`; only a failure of
//! the window manager itself is an error.

use config::{InteractionFlag, OverlayConfig, OverlaySize, UNSET_START};
use overlay_winops::{DisplayMetrics, Point, height_px, width_px, x_px};
use tracing::debug;

use crate::{Engine, error::Result};

/// Overlay offset in dp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpPosition {
    pub x: f64,
    pub y: f64,
}

/// Initial offset in px for a start position given in dp.
///
/// An absent or unset X starts at 0; an absent or unset Y tucks the overlay
/// under the status bar. A sentinel X leaves the overlay unconstrained.
pub fn resolve_start(x: Option<i32>, y: Option<i32>, display: &DisplayMetrics) -> Point {
    let x = match x {
        None | Some(UNSET_START) => 0,
        Some(v) => x_px(v, display),
    };
    let y = match y {
        None | Some(UNSET_START) => -display.status_bar_px,
        Some(v) => display.dp_to_px(v),
    };
    Point { x, y }
}

impl Engine {
    /// Current offset in dp, or `None` when no overlay is attached.
    pub fn get_position(&self) -> Option<DpPosition> {
        let handle = self.surface.handle()?;
        Some(DpPosition {
            x: handle.display.px_to_dp(handle.attrs.x),
            y: handle.display.px_to_dp(handle.attrs.y),
        })
    }

    /// Move to `(x, y)` in dp. A sentinel X (-1 or -1999) leaves the overlay
    /// horizontally unconstrained. Cancels any running snap.
    pub fn move_position(&self, x: i32, y: i32) -> Result<bool> {
        self.snap.cancel();
        let Some(handle) = self.surface.handle() else {
            debug!("move: overlay not attached");
            return Ok(false);
        };
        let (px, py) = (x_px(x, &handle.display), handle.display.dp_to_px(y));
        Ok(self
            .surface
            .mutate(|a| a.with_position(px, py))?
            .is_some())
    }

    /// Resize to `width` x `height` dp and set drag enablement.
    ///
    /// A sentinel width fills the display; a sentinel height is applied as
    /// the literal value.
    pub fn resize(&self, width: i32, height: i32, drag_enabled: bool) -> Result<bool> {
        let Some(handle) = self.surface.handle() else {
            debug!("resize: overlay not attached");
            return Ok(false);
        };
        let (w, h) = (
            width_px(width, &handle.display),
            height_px(height, &handle.display),
        );
        let applied = self
            .surface
            .mutate(|mut a| {
                a.width = w;
                a.height = h;
                a
            })?
            .is_some();
        if applied {
            self.config.update(|c| OverlayConfig {
                size: OverlaySize { width, height },
                drag_enabled,
                ..c.clone()
            });
        }
        Ok(applied)
    }

    /// Switch the interaction flag by name. Unknown names keep the current
    /// flag and re-apply it.
    pub fn update_flag(&self, name: &str) -> Result<bool> {
        if !self.surface.is_live() {
            debug!(flag = name, "updateFlag: overlay not attached");
            return Ok(false);
        }
        let current = self.config.snapshot().interaction;
        let flag = InteractionFlag::from_name(name).unwrap_or_else(|| {
            debug!(flag = name, "unknown flag, keeping current");
            current
        });
        let applied = self.surface.mutate(|a| a.with_interaction(flag))?.is_some();
        if applied && flag != current {
            self.config.update(|c| c.with_interaction(flag));
        }
        Ok(applied)
    }

    /// Force click-through on, or restore the configured flag.
    pub fn set_click_through(&self, enable: bool) -> Result<bool> {
        let configured = self.config.snapshot().interaction;
        Ok(self
            .surface
            .mutate(|a| a.with_click_through(enable, configured))?
            .is_some())
    }

    /// Set a blur-behind radius; zero disables blur.
    pub fn set_blur(&self, radius: i32) -> Result<bool> {
        Ok(self.surface.mutate(|a| a.with_blur(radius))?.is_some())
    }
}
