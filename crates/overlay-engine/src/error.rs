use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by interactive overlay operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The window manager rejected a layout update. The surface has been
    /// treated as gone and released.
    #[error("layout mutation failed: {0}")]
    LayoutMutationFailed(#[source] overlay_winops::Error),

    /// The surface could not be created or attached.
    #[error("attach failed: {0}")]
    AttachFailed(#[source] overlay_winops::Error),
}
