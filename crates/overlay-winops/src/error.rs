use thiserror::Error;

/// Errors reported by the window manager and render host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The window token no longer refers to an attached window.
    #[error("window gone (token no longer attached)")]
    WindowGone,

    /// The token was never issued by this window manager.
    #[error("bad window token")]
    BadToken,

    /// Display metrics could not be read.
    #[error("display metrics unavailable")]
    DisplayUnavailable,

    /// The render host could not provide a drawable surface.
    #[error("failed to create render surface")]
    SurfaceCreate,

    /// The platform rejected the request.
    #[error("rejected by platform: {0}")]
    Rejected(String),

    /// The main-thread op queue has no receiver.
    #[error("main-thread op queue closed")]
    QueueClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
