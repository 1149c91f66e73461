//! Typed control-channel definitions.
//!
//! This module defines the method names, request/reply structures and stable
//! error codes used between a host application and the overlay service.
//! Request field names use camelCase on the wire to match host callers.

use serde::{Deserialize, Serialize};

/// Control-channel methods recognised by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMethod {
    /// Configure and attach the overlay.
    Show,
    /// Detach the overlay and stop the service.
    Close,
    /// Whether the overlay service is running.
    IsActive,
    /// Move the overlay to a position in dp.
    Move,
    /// Current overlay position in dp.
    GetPosition,
    /// Change overlay size and drag enablement.
    Resize,
    /// Replace the interaction flag.
    UpdateFlag,
    /// Toggle click-through on the attached overlay.
    SetClickThrough,
    /// Set or clear background blur.
    SetBlur,
    /// Open the overlay permission flow.
    RequestOverlayPermission,
    /// Query the overlay permission.
    CheckOverlayPermission,
    /// Open the accessibility settings flow.
    RequestAccessibilityPermission,
    /// Query the accessibility permission.
    CheckAccessibilityPermission,
    /// Pulse a short wake lock.
    TurnScreenOff,
}

impl OverlayMethod {
    /// All methods in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Show,
        Self::Close,
        Self::IsActive,
        Self::Move,
        Self::GetPosition,
        Self::Resize,
        Self::UpdateFlag,
        Self::SetClickThrough,
        Self::SetBlur,
        Self::RequestOverlayPermission,
        Self::CheckOverlayPermission,
        Self::RequestAccessibilityPermission,
        Self::CheckAccessibilityPermission,
        Self::TurnScreenOff,
    ];

    /// Stable string name for the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Close => "close",
            Self::IsActive => "isActive",
            Self::Move => "move",
            Self::GetPosition => "getPosition",
            Self::Resize => "resize",
            Self::UpdateFlag => "updateFlag",
            Self::SetClickThrough => "setClickThrough",
            Self::SetBlur => "setBlur",
            Self::RequestOverlayPermission => "requestOverlayPermission",
            Self::CheckOverlayPermission => "checkOverlayPermission",
            Self::RequestAccessibilityPermission => "requestAccessibilityPermission",
            Self::CheckAccessibilityPermission => "checkAccessibilityPermission",
            Self::TurnScreenOff => "turnScreenOff",
        }
    }

    /// Parse a method name. Older host bindings use the longer names on the
    /// right; both spellings are accepted.
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "show" | "showOverlay" => Some(Self::Show),
            "close" | "closeOverlay" => Some(Self::Close),
            "isActive" | "isOverlayActive" => Some(Self::IsActive),
            "move" | "moveOverlay" | "updateOverlayPosition" => Some(Self::Move),
            "getPosition" | "getOverlayPosition" => Some(Self::GetPosition),
            "resize" | "resizeOverlay" => Some(Self::Resize),
            "updateFlag" => Some(Self::UpdateFlag),
            "setClickThrough" => Some(Self::SetClickThrough),
            "setBlur" | "setBlurSettings" => Some(Self::SetBlur),
            "requestOverlayPermission" | "requestPermission" => {
                Some(Self::RequestOverlayPermission)
            }
            "checkOverlayPermission" | "checkPermission" => Some(Self::CheckOverlayPermission),
            "requestAccessibilityPermission" => Some(Self::RequestAccessibilityPermission),
            "checkAccessibilityPermission" => Some(Self::CheckAccessibilityPermission),
            "turnScreenOff" => Some(Self::TurnScreenOff),
            _ => None,
        }
    }
}

/// Start coordinates in dp. Either axis may be omitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StartPosition {
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
}

/// `show` request. Every field except `enableDrag` is optional and falls back
/// to a service default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowReq {
    pub height: Option<i32>,
    pub width: Option<i32>,
    pub alignment: Option<String>,
    pub flag: Option<String>,
    pub overlay_title: Option<String>,
    pub overlay_content: Option<String>,
    pub notification_visibility: Option<String>,
    pub enable_drag: bool,
    /// Snap policy name (`none`, `left`, `right`, `auto`).
    pub position_gravity: Option<String>,
    pub start_position: Option<StartPosition>,
}

/// `move` request in dp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveReq {
    pub x: i32,
    pub y: i32,
}

/// `resize` request in dp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResizeReq {
    pub width: i32,
    pub height: i32,
    pub enable_drag: bool,
}

/// `updateFlag` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateFlagReq {
    pub flag: String,
}

/// `setClickThrough` request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClickThroughReq {
    pub enable: bool,
}

/// `setBlur` request. A radius of zero disables blur.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlurReq {
    pub blur_radius: i32,
}

/// Overlay position in dp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One method invocation: the method name plus a msgpack-encoded request
/// (empty for argument-less methods).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub payload: Vec<u8>,
}

/// Successful method results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MethodReply {
    /// Method completed without a value.
    Unit,
    /// Boolean outcome.
    Bool(bool),
    /// Position query outcome; `None` when no overlay is attached.
    Position(Option<Position>),
}

impl MethodReply {
    /// Boolean payload, if this is a boolean reply.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Failed method result carrying a stable error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodError {
    /// Stable code, e.g. `PERMISSION`.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

/// Broadcast action emitted when the render engine must be re-provisioned.
pub const RESTART_REQUIRED_ACTION: &str = "overlay.window.RESTART_REQUIRED";

/// Broadcast action carrying cached accessibility event payloads.
pub const ACCESSIBILITY_EVENT_ACTION: &str = "accessibility_event";
