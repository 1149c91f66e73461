//! Window flag and gravity bitmasks.
//!
//! Bit values follow the platform window manager's layout attribute encoding so
//! the attributes can be handed to it without translation.

use config::{Alignment, InteractionFlag};

bitflags::bitflags! {
    /// Window behaviour flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        /// Blur whatever is behind the window.
        const BLUR_BEHIND = 0x0000_0004;
        /// Never take key input focus.
        const NOT_FOCUSABLE = 0x0000_0008;
        /// Never receive touch events.
        const NOT_TOUCHABLE = 0x0000_0010;
        /// Let touches outside the window reach windows behind it.
        const NOT_TOUCH_MODAL = 0x0000_0020;
        /// Place the window within the entire screen.
        const LAYOUT_IN_SCREEN = 0x0000_0100;
        /// Allow the window to extend outside the screen.
        const LAYOUT_NO_LIMITS = 0x0000_0200;
        /// Hide decorations while the window is shown.
        const FULLSCREEN = 0x0000_0400;
        /// Account for screen decorations when in screen layout.
        const LAYOUT_INSET_DECOR = 0x0001_0000;
        /// Hardware-accelerated rendering.
        const HARDWARE_ACCELERATED = 0x0100_0000;
    }
}

impl WindowFlags {
    /// Structural flags every overlay carries so it can render outside the
    /// owning application's window bounds.
    pub const MANDATORY: Self = Self::LAYOUT_NO_LIMITS
        .union(Self::LAYOUT_IN_SCREEN)
        .union(Self::LAYOUT_INSET_DECOR)
        .union(Self::HARDWARE_ACCELERATED);

    /// Base flags for an interaction mode, without the mandatory set.
    pub fn base_for(interaction: InteractionFlag) -> Self {
        match interaction {
            InteractionFlag::ClickThroughAndUnfocusable => Self::NOT_TOUCHABLE | Self::NOT_FOCUSABLE,
            InteractionFlag::ClickThroughButFocusable => Self::NOT_TOUCHABLE,
            InteractionFlag::FullyInteractive => Self::NOT_FOCUSABLE,
            InteractionFlag::FullyInteractiveWithFocus => Self::NOT_TOUCH_MODAL,
        }
    }

    /// Full flag set for an interaction mode.
    pub fn for_interaction(interaction: InteractionFlag) -> Self {
        Self::base_for(interaction) | Self::MANDATORY
    }
}

bitflags::bitflags! {
    /// Anchor gravity. Each axis is a 3-bit field: `0b011` pulls to the start
    /// edge, `0b101` to the end edge, `0b001` centers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Gravity: u32 {
        const CENTER_HORIZONTAL = 0x01;
        const LEFT = 0x03;
        const RIGHT = 0x05;
        const CENTER_VERTICAL = 0x10;
        const TOP = 0x30;
        const BOTTOM = 0x50;
        const CENTER = 0x11;
    }
}

/// Placement along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAnchor {
    Start,
    Center,
    End,
}

impl Gravity {
    const AXIS_MASK: u32 = 0x07;
    const VERTICAL_SHIFT: u32 = 4;

    /// Gravity for one of the nine alignments.
    pub fn for_alignment(alignment: Alignment) -> Self {
        match alignment {
            Alignment::TopLeft => Self::TOP | Self::LEFT,
            Alignment::TopCenter => Self::TOP | Self::CENTER_HORIZONTAL,
            Alignment::TopRight => Self::TOP | Self::RIGHT,
            Alignment::CenterLeft => Self::CENTER_VERTICAL | Self::LEFT,
            Alignment::Center => Self::CENTER,
            Alignment::CenterRight => Self::CENTER_VERTICAL | Self::RIGHT,
            Alignment::BottomLeft => Self::BOTTOM | Self::LEFT,
            Alignment::BottomCenter => Self::BOTTOM | Self::CENTER_HORIZONTAL,
            Alignment::BottomRight => Self::BOTTOM | Self::RIGHT,
        }
    }

    pub fn horizontal(&self) -> AxisAnchor {
        axis(self.bits() & Self::AXIS_MASK)
    }

    pub fn vertical(&self) -> AxisAnchor {
        axis((self.bits() >> Self::VERTICAL_SHIFT) & Self::AXIS_MASK)
    }
}

fn axis(bits: u32) -> AxisAnchor {
    match bits {
        0b011 => AxisAnchor::Start,
        0b101 => AxisAnchor::End,
        // Centered, or no gravity on this axis.
        _ => AxisAnchor::Center,
    }
}
