//! overlay-winops: the platform seam for the overlay window.
//!
//! - [`WindowManager`] and [`RenderHost`] abstract the compositor and the
//!   external content engine.
//! - [`LayoutParamsBuilder`] maps an overlay configuration to
//!   [`WindowAttributes`].
//! - [`MainOp`] carries work that must be applied on the UI thread.
//! - [`headless`] provides in-memory implementations of both traits.

mod error;
mod flags;
mod geom;
pub mod headless;
mod layout;
mod main_thread_ops;
mod ops;

pub use error::{Error, Result};
pub use flags::{AxisAnchor, Gravity, WindowFlags};
pub use geom::{DisplayMetrics, Frame, Point, Size};
pub use layout::{
    CLICK_THROUGH_MAX_ALPHA, LayoutParamsBuilder, MATCH_PARENT, UNCONSTRAINED_X, WRAP_CONTENT,
    WindowAttributes, alpha_for, height_px, width_px, x_px,
};
pub use main_thread_ops::{MainOp, MainOpSender, main_op_channel};
pub use ops::{RenderHost, SurfaceId, WindowManager, WindowToken};
