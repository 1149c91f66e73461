//! Pixel-space geometry and density conversion.

use config::FallbackDisplay;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Absolute on-screen frame in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Frame {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Display dimensions and density for the display hosting the overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMetrics {
    pub width_px: i32,
    pub height_px: i32,
    /// Pixels per dp.
    pub density: f32,
    pub status_bar_px: i32,
}

impl DisplayMetrics {
    /// Metrics used when the platform reports none.
    pub fn fallback(fallback: &FallbackDisplay, status_bar_dp: i32) -> Self {
        let mut m = Self {
            width_px: fallback.width_px,
            height_px: fallback.height_px,
            density: fallback.density,
            status_bar_px: 0,
        };
        m.status_bar_px = m.dp_to_px(status_bar_dp);
        m
    }

    /// Convert dp to px, truncating toward zero.
    #[inline]
    pub fn dp_to_px(&self, dp: i32) -> i32 {
        (dp as f32 * self.density) as i32
    }

    #[inline]
    pub fn px_to_dp(&self, px: i32) -> f64 {
        px as f64 / self.density as f64
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width_px,
            height: self.height_px,
        }
    }
}
