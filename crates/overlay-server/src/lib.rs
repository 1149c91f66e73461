//! Overlay window service.
//!
//! Public API
//! - `OverlayService`: typed operations plus `dispatch(MethodCall)` for the
//!   control channel. Holds one overlay engine and its lifecycle.
//! - `Server`: runs an `OverlayService` on a dedicated UI thread and hands out
//!   cloneable `ServerHandle`s.
//! - `Lifecycle`: start/stop state machine (`Stopped -> Starting -> Attached
//!   -> Stopping -> Stopped`).
//! - `Platform`: the power, notification, preference and permission
//!   collaborators next to the window manager and render host.
//!
//! Threading
//! - Window attributes are only ever mutated on the UI thread. Snap ticks run
//!   on a small tokio runtime owned by the server; they compute positions and
//!   queue them for the UI thread, which applies only steps from the current
//!   animation.
//!
//! Errors
//! - Control-channel failures carry a stable code (`PERMISSION`,
//!   `ENGINE_UNAVAILABLE`, `MOVE_ERROR`, ...). "No overlay attached" is not an
//!   error: mutators answer `false` and `getPosition` answers `None`.
//! - Only a redelivered start emits `RestartRequired` to the host.
#![allow(missing_docs)]

mod error;
pub mod headless;
mod lifecycle;
mod notification;
mod platform;
mod server;
mod service;
mod wake_lock;

pub use error::{Error, Result, RpcErrorCode};
pub use lifecycle::{Lifecycle, LifecycleState, StartAction, StartOutcome, StartRequest};
pub use notification::{
    CHANNEL_ID, DEFAULT_BODY, DEFAULT_TITLE, ForegroundNotice, NOTIFICATION_ID,
};
pub use platform::{
    ACCESSIBILITY_NODE_KEY, Notification, NotificationManager, Platform, PowerManager,
    Preferences, RESTART_ON_BOOT_KEY,
};
pub use server::{Server, ServerHandle};
pub use service::{OverlayService, overlay_config_from_show};
pub use wake_lock::{WakeLock, pulse};
