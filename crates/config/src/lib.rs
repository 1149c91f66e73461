//! Configuration types for the overlay window service.
//!
//! - [`OverlayConfig`]: what one `show` request asked for (size, anchor,
//!   interaction flag, snap policy, notification text).
//! - [`ConfigCell`]: shared holder that hands out consistent snapshots.
//! - [`Settings`]: service tunables loaded from an optional RON file.
#![allow(missing_docs)]

mod error;
mod overlay;
mod settings;

pub use error::Error;
pub use overlay::{
    Alignment, ConfigCell, DIMENSION_SENTINEL, DIMENSION_SENTINEL_LEGACY, InteractionFlag,
    NotificationVisibility, OverlayConfig, OverlaySize, SnapPolicy, UNSET_START, is_sentinel,
};
pub use settings::{FallbackDisplay, SETTINGS_ENV, Settings, default_settings_path};
