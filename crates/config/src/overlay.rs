//! Overlay window configuration resolved at each `show` request.
//!
//! The value is immutable once built. Components that need the current
//! configuration read a snapshot from a [`ConfigCell`]; writers publish a whole
//! new value so no reader ever observes a half-updated record.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Sentinel used by callers for "fill / unconstrained" dimensions and coordinates.
pub const DIMENSION_SENTINEL: i32 = -1;

/// Legacy alias of [`DIMENSION_SENTINEL`] still emitted by older callers.
pub const DIMENSION_SENTINEL_LEGACY: i32 = -1999;

/// Start coordinate meaning "not provided".
pub const UNSET_START: i32 = -6;

/// Returns true when `v` is one of the two "unconstrained" sentinels.
pub fn is_sentinel(v: i32) -> bool {
    v == DIMENSION_SENTINEL || v == DIMENSION_SENTINEL_LEGACY
}

/// Requested overlay size in density-independent units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySize {
    /// Width in dp, or a sentinel for "match parent".
    pub width: i32,
    /// Height in dp, or a sentinel that is passed through unchanged.
    pub height: i32,
}

impl Default for OverlaySize {
    fn default() -> Self {
        Self {
            width: DIMENSION_SENTINEL,
            height: DIMENSION_SENTINEL,
        }
    }
}

/// One of nine anchor positions for the overlay on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Alignment {
    /// All nine anchors, row by row from the top left.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Parse a control-channel alignment name. Unknown names fall back to center.
    pub fn from_name(name: &str) -> Self {
        match name {
            "topLeft" => Self::TopLeft,
            "topCenter" => Self::TopCenter,
            "topRight" => Self::TopRight,
            "centerLeft" => Self::CenterLeft,
            "center" => Self::Center,
            "centerRight" => Self::CenterRight,
            "bottomLeft" => Self::BottomLeft,
            "bottomCenter" => Self::BottomCenter,
            "bottomRight" => Self::BottomRight,
            other => {
                tracing::debug!(alignment = other, "unknown alignment, using center");
                Self::Center
            }
        }
    }

    /// Stable control-channel name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "topLeft",
            Self::TopCenter => "topCenter",
            Self::TopRight => "topRight",
            Self::CenterLeft => "centerLeft",
            Self::Center => "center",
            Self::CenterRight => "centerRight",
            Self::BottomLeft => "bottomLeft",
            Self::BottomCenter => "bottomCenter",
            Self::BottomRight => "bottomRight",
        }
    }

    /// Anchored to the right edge: horizontal drag deltas are inverted.
    pub fn anchored_right(&self) -> bool {
        matches!(self, Self::TopRight | Self::CenterRight | Self::BottomRight)
    }

    /// Anchored to the bottom edge: vertical drag deltas are inverted.
    pub fn anchored_bottom(&self) -> bool {
        matches!(
            self,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight
        )
    }
}

/// How the overlay participates in touch and focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionFlag {
    /// Touches pass through to windows below; the overlay never takes focus.
    ClickThroughAndUnfocusable,
    /// Touches pass through, but the overlay may still take key focus.
    ClickThroughButFocusable,
    /// Receives touches inside its bounds without taking key focus.
    #[default]
    FullyInteractive,
    /// Receives touches and may take key focus; touches outside still reach other windows.
    FullyInteractiveWithFocus,
}

impl InteractionFlag {
    /// Parse a flag name. Returns `None` for unknown names so callers can keep
    /// the flag that was in effect.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clickThrough" | "flagNotTouchable" => Some(Self::ClickThroughAndUnfocusable),
            "clickThroughFocusable" => Some(Self::ClickThroughButFocusable),
            "defaultFlag" | "flagNotFocusable" => Some(Self::FullyInteractive),
            "focusPointer" | "flagNotTouchModal" => Some(Self::FullyInteractiveWithFocus),
            _ => None,
        }
    }
}

/// Where the overlay settles after a drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapPolicy {
    #[default]
    None,
    Left,
    Right,
    /// Nearest horizontal edge, judged by the overlay's horizontal center.
    Auto,
}

impl SnapPolicy {
    /// Parse a `positionGravity` name. Unknown names disable snapping.
    pub fn from_name(name: &str) -> Self {
        match name {
            "left" => Self::Left,
            "right" => Self::Right,
            "auto" => Self::Auto,
            _ => Self::None,
        }
    }
}

/// Lock-screen visibility of the persistent notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationVisibility {
    Public,
    #[default]
    Private,
    Secret,
}

impl NotificationVisibility {
    /// Parse a visibility name; anything unrecognised is private.
    pub fn from_name(name: &str) -> Self {
        match name {
            "visibilityPublic" => Self::Public,
            "visibilitySecret" => Self::Secret,
            _ => Self::Private,
        }
    }
}

/// Complete configuration for one shown overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Requested size in dp.
    pub size: OverlaySize,
    /// Anchor on the display.
    pub alignment: Alignment,
    /// Touch and focus behaviour.
    pub interaction: InteractionFlag,
    /// Whether pointer drags move the overlay.
    pub drag_enabled: bool,
    /// Post-release snapping rule.
    pub snap: SnapPolicy,
    /// Persistent notification visibility.
    pub notification_visibility: NotificationVisibility,
    /// Notification title; `None` uses the service default.
    pub title: Option<String>,
    /// Notification body.
    pub body: String,
}

impl OverlayConfig {
    /// Copy with a different interaction flag.
    pub fn with_interaction(&self, interaction: InteractionFlag) -> Self {
        Self {
            interaction,
            ..self.clone()
        }
    }

    /// Copy with drag enabled or disabled.
    pub fn with_drag_enabled(&self, drag_enabled: bool) -> Self {
        Self {
            drag_enabled,
            ..self.clone()
        }
    }
}

/// Shared holder of the current [`OverlayConfig`] snapshot.
#[derive(Clone, Default)]
pub struct ConfigCell {
    inner: Arc<RwLock<Arc<OverlayConfig>>>,
}

impl ConfigCell {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Current snapshot. Cheap; clones an `Arc`.
    pub fn snapshot(&self) -> Arc<OverlayConfig> {
        self.inner.read().clone()
    }

    /// Replace the configuration wholesale.
    pub fn replace(&self, config: OverlayConfig) {
        *self.inner.write() = Arc::new(config);
    }

    /// Publish a modified copy of the current configuration.
    ///
    /// The read-modify-write happens under the write lock so concurrent
    /// updates do not lose each other's changes.
    pub fn update<F>(&self, f: F) -> Arc<OverlayConfig>
    where
        F: FnOnce(&OverlayConfig) -> OverlayConfig,
    {
        let mut guard = self.inner.write();
        let next = Arc::new(f(&guard));
        *guard = next.clone();
        next
    }
}

impl std::fmt::Debug for ConfigCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConfigCell").field(&self.snapshot()).finish()
    }
}
