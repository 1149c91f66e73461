//! Error handling for overlayctl.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for overlayctl operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that stop a run. Failed control calls are not errors here; they
/// are reported on stdout like any other reply.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Settings could not be loaded.
    #[error("{}", .0.pretty())]
    Settings(#[from] config::Error),
    /// The script is not valid RON.
    #[error("script parse error: {0}")]
    Script(#[from] ron::error::SpannedError),
    /// A `Sleep` step carried an unreadable duration.
    #[error("step {step}: invalid duration '{raw}': {source}")]
    Duration {
        /// 1-based step index.
        step: usize,
        /// The duration text as written.
        raw: String,
        /// Parser failure.
        #[source]
        source: humantime::DurationError,
    },
    /// A request could not be encoded for the control channel.
    #[error("encode error: {0}")]
    Codec(#[from] overlay_protocol::ipc::codec::Error),
    /// The service failed to start.
    #[error("server error: {0}")]
    Server(#[from] overlay_server::Error),
    /// A reply could not be written as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
