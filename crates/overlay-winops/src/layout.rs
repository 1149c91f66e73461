//! Window attribute records and the pure layout builder.

use config::{InteractionFlag, OverlayConfig, is_sentinel};

use crate::{
    flags::{AxisAnchor, Gravity, WindowFlags},
    geom::{DisplayMetrics, Frame, Size},
};

/// Fill the parent along this dimension.
pub const MATCH_PARENT: i32 = -1;
/// Size to the content along this dimension.
pub const WRAP_CONTENT: i32 = -2;
/// Opacity ceiling for a fully click-through, unfocusable overlay.
pub const CLICK_THROUGH_MAX_ALPHA: f32 = 0.8;
/// Horizontal offset meaning "let the anchor decide".
pub const UNCONSTRAINED_X: i32 = -1;

/// Attributes handed to the window manager for the overlay window.
///
/// `x`/`y` are pixel offsets relative to the anchor selected by `gravity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAttributes {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
    pub gravity: Gravity,
    pub flags: WindowFlags,
    pub alpha: f32,
    pub blur_radius: i32,
}

/// Builds [`WindowAttributes`] from an overlay configuration.
pub struct LayoutParamsBuilder;

impl LayoutParamsBuilder {
    /// Map `config` and the display metrics to a window attribute record.
    pub fn build(config: &OverlayConfig, display: &DisplayMetrics) -> WindowAttributes {
        WindowAttributes {
            width: width_px(config.size.width, display),
            height: height_px(config.size.height, display),
            x: 0,
            y: 0,
            gravity: Gravity::for_alignment(config.alignment),
            flags: WindowFlags::for_interaction(config.interaction),
            alpha: alpha_for(config.interaction),
            blur_radius: 0,
        }
    }
}

/// Opacity for an interaction mode.
pub fn alpha_for(interaction: InteractionFlag) -> f32 {
    if interaction == InteractionFlag::ClickThroughAndUnfocusable {
        CLICK_THROUGH_MAX_ALPHA
    } else {
        1.0
    }
}

/// Width in px; a sentinel fills the parent.
pub fn width_px(width_dp: i32, display: &DisplayMetrics) -> i32 {
    if is_sentinel(width_dp) {
        MATCH_PARENT
    } else {
        display.dp_to_px(width_dp)
    }
}

/// Height in px. A sentinel is passed through as the literal value.
pub fn height_px(height_dp: i32, display: &DisplayMetrics) -> i32 {
    if is_sentinel(height_dp) {
        height_dp
    } else {
        display.dp_to_px(height_dp)
    }
}

/// Horizontal offset in px; a sentinel leaves the overlay unconstrained.
pub fn x_px(x_dp: i32, display: &DisplayMetrics) -> i32 {
    if is_sentinel(x_dp) {
        UNCONSTRAINED_X
    } else {
        display.dp_to_px(x_dp)
    }
}

impl WindowAttributes {
    /// Replace the flag set with the one for `interaction`, dropping any
    /// click-through or blur overrides.
    pub fn with_interaction(mut self, interaction: InteractionFlag) -> Self {
        self.flags = WindowFlags::for_interaction(interaction);
        self.alpha = alpha_for(interaction);
        self.blur_radius = 0;
        self
    }

    /// Force click-through on, or restore the configured interaction flag.
    pub fn with_click_through(self, enable: bool, configured: InteractionFlag) -> Self {
        if enable {
            self.with_interaction(InteractionFlag::ClickThroughAndUnfocusable)
        } else {
            self.with_interaction(configured)
        }
    }

    /// Set a blur-behind radius; zero or less clears it.
    pub fn with_blur(mut self, radius: i32) -> Self {
        if radius > 0 {
            self.flags |= WindowFlags::BLUR_BEHIND;
            self.blur_radius = radius;
            self.alpha = CLICK_THROUGH_MAX_ALPHA;
        } else {
            self.flags.remove(WindowFlags::BLUR_BEHIND);
            self.blur_radius = 0;
            self.alpha = 1.0;
        }
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Resolve the concrete window size. `content` is what the surface would
    /// measure at when asked to wrap.
    pub fn resolve_size(&self, display: &DisplayMetrics, content: Size) -> Size {
        Size {
            width: resolve_dim(self.width, display.width_px, content.width),
            height: resolve_dim(self.height, display.height_px, content.height),
        }
    }

    /// Absolute on-screen frame given the anchor and offsets.
    pub fn resolve_frame(&self, display: &DisplayMetrics, content: Size) -> Frame {
        let size = self.resolve_size(display, content);
        Frame {
            x: place(
                self.gravity.horizontal(),
                self.x,
                size.width,
                display.width_px,
            ),
            y: place(
                self.gravity.vertical(),
                self.y,
                size.height,
                display.height_px,
            ),
            w: size.width,
            h: size.height,
        }
    }
}

fn resolve_dim(value: i32, parent: i32, content: i32) -> i32 {
    match value {
        MATCH_PARENT => parent,
        v if v < 0 => content,
        v => v,
    }
}

fn place(anchor: AxisAnchor, offset: i32, len: i32, parent: i32) -> i32 {
    match anchor {
        AxisAnchor::Start => offset,
        AxisAnchor::Center => (parent.saturating_sub(len) / 2).saturating_add(offset),
        AxisAnchor::End => parent.saturating_sub(len).saturating_sub(offset),
    }
}

#[cfg(test)]
mod tests {
    use config::{Alignment, OverlaySize};

    use super::*;

    fn display() -> DisplayMetrics {
        DisplayMetrics {
            width_px: 1080,
            height_px: 1920,
            density: 2.0,
            status_bar_px: 50,
        }
    }

    fn cfg(width: i32, height: i32, alignment: Alignment) -> OverlayConfig {
        OverlayConfig {
            size: OverlaySize { width, height },
            alignment,
            ..OverlayConfig::default()
        }
    }

    #[test]
    fn builds_sizes_and_gravity() {
        let a = LayoutParamsBuilder::build(&cfg(200, 100, Alignment::TopRight), &display());
        assert_eq!((a.width, a.height), (400, 200));
        assert_eq!(a.gravity, Gravity::TOP | Gravity::RIGHT);
        assert_eq!(a.alpha, 1.0);
        assert!(a.flags.contains(WindowFlags::NOT_FOCUSABLE | WindowFlags::MANDATORY));
    }

    #[test]
    fn sentinel_width_fills_height_passes_through() {
        let a = LayoutParamsBuilder::build(&cfg(-1999, -1999, Alignment::Center), &display());
        assert_eq!(a.width, MATCH_PARENT);
        assert_eq!(a.height, -1999);
        let b = LayoutParamsBuilder::build(&cfg(-1, -1, Alignment::Center), &display());
        assert_eq!((b.width, b.height), (MATCH_PARENT, -1));
    }

    #[test]
    fn click_through_unfocusable_caps_alpha() {
        let config = OverlayConfig {
            interaction: InteractionFlag::ClickThroughAndUnfocusable,
            ..OverlayConfig::default()
        };
        let a = LayoutParamsBuilder::build(&config, &display());
        assert_eq!(a.alpha, CLICK_THROUGH_MAX_ALPHA);
        assert!(a.flags.contains(WindowFlags::NOT_TOUCHABLE | WindowFlags::NOT_FOCUSABLE));

        let focusable = config.with_interaction(InteractionFlag::ClickThroughButFocusable);
        assert_eq!(LayoutParamsBuilder::build(&focusable, &display()).alpha, 1.0);
    }

    #[test]
    fn blur_toggles_flag_and_alpha() {
        let a = LayoutParamsBuilder::build(&OverlayConfig::default(), &display()).with_blur(12);
        assert!(a.flags.contains(WindowFlags::BLUR_BEHIND));
        assert_eq!((a.blur_radius, a.alpha), (12, CLICK_THROUGH_MAX_ALPHA));
        let b = a.with_blur(0);
        assert!(!b.flags.contains(WindowFlags::BLUR_BEHIND));
        assert_eq!((b.blur_radius, b.alpha), (0, 1.0));
    }

    #[test]
    fn click_through_restores_configured_flag() {
        let base = LayoutParamsBuilder::build(&OverlayConfig::default(), &display());
        let on = base.with_click_through(true, InteractionFlag::FullyInteractive);
        assert!(on.flags.contains(WindowFlags::NOT_TOUCHABLE));
        assert_eq!(on.alpha, CLICK_THROUGH_MAX_ALPHA);
        let off = on.with_click_through(false, InteractionFlag::FullyInteractive);
        assert_eq!(off.flags, base.flags);
        assert_eq!(off.alpha, 1.0);
    }

    #[test]
    fn extreme_offsets_saturate() {
        let d = display();
        let centered = LayoutParamsBuilder::build(&cfg(100, 50, Alignment::Center), &d)
            .with_position(i32::MAX, i32::MIN);
        let f = centered.resolve_frame(&d, Size::default());
        assert_eq!((f.x, f.y), (i32::MAX, i32::MIN + (1920 - 100) / 2));
        let end = LayoutParamsBuilder::build(&cfg(100, 50, Alignment::BottomRight), &d)
            .with_position(i32::MIN, 0);
        assert_eq!(end.resolve_frame(&d, Size::default()).x, i32::MAX);
    }

    #[test]
    fn frame_resolves_against_anchor() {
        let d = display();
        let content = Size {
            width: 100,
            height: 100,
        };
        let center = LayoutParamsBuilder::build(&cfg(200, 100, Alignment::Center), &d);
        let f = center.resolve_frame(&d, content);
        assert_eq!((f.x, f.y, f.w, f.h), ((1080 - 400) / 2, (1920 - 200) / 2, 400, 200));

        let br = LayoutParamsBuilder::build(&cfg(200, 100, Alignment::BottomRight), &d)
            .with_position(10, 20);
        let f = br.resolve_frame(&d, content);
        assert_eq!((f.x, f.y), (1080 - 400 - 10, 1920 - 200 - 20));

        let wrap = LayoutParamsBuilder::build(&cfg(-1, -1999, Alignment::TopLeft), &d);
        assert_eq!(
            wrap.resolve_size(&d, content),
            Size {
                width: 1080,
                height: 100
            }
        );
    }

    #[test]
    fn x_sentinels_are_unconstrained() {
        let d = display();
        assert_eq!(x_px(-1, &d), UNCONSTRAINED_X);
        assert_eq!(x_px(-1999, &d), UNCONSTRAINED_X);
        assert_eq!(x_px(15, &d), 30);
    }
}
