use std::{io::Error as IoError, result::Result as StdResult};

use overlay_protocol::{MethodError, ipc::codec};
use thiserror::Error;

/// Errors surfaced by overlay service operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The process may not draw overlays.
    #[error("overlay permission is not enabled")]
    PermissionDenied,

    /// The render engine does not exist.
    #[error("render engine unavailable")]
    EngineUnavailable,

    /// The render engine exists but its executor or renderer is not responding.
    #[error("render engine is in an invalid state")]
    EngineInvalid,

    /// The render engine refused the resume notification on a restart.
    #[error("render engine resume failed: {0}")]
    ResumeFailed(#[source] overlay_winops::Error),

    /// The overlay window could not be attached.
    #[error("attach failed: {0}")]
    AttachFailed(String),

    /// A window layout update failed; the overlay has been torn down.
    #[error("layout mutation failed: {0}")]
    LayoutMutationFailed(String),

    /// The request payload did not match the method.
    #[error("invalid arguments for {method}: {message}")]
    InvalidArgs {
        /// Method name as received.
        method: String,
        /// Decoder message.
        message: String,
    },

    /// Unknown method name.
    #[error("method not implemented: {0}")]
    MethodNotFound(String),

    /// Payload encoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] codec::Error),

    /// The service thread or runtime could not be started.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// The service no longer accepts calls.
    #[error("overlay service is shutting down")]
    ShuttingDown,
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<overlay_engine::Error> for Error {
    fn from(err: overlay_engine::Error) -> Self {
        match err {
            overlay_engine::Error::LayoutMutationFailed(e) => {
                Self::LayoutMutationFailed(e.to_string())
            }
            overlay_engine::Error::AttachFailed(e) => Self::AttachFailed(e.to_string()),
        }
    }
}

impl Error {
    /// Stable control-channel code for this error.
    pub fn code(&self) -> RpcErrorCode {
        match self {
            Self::PermissionDenied => RpcErrorCode::Permission,
            Self::EngineUnavailable => RpcErrorCode::EngineUnavailable,
            Self::EngineInvalid | Self::ResumeFailed(_) => RpcErrorCode::EngineInvalid,
            Self::LayoutMutationFailed(_) => RpcErrorCode::MoveError,
            Self::AttachFailed(_) | Self::Io(_) => RpcErrorCode::MethodError,
            Self::InvalidArgs { .. } | Self::Codec(_) => RpcErrorCode::InvalidArgs,
            Self::MethodNotFound(_) => RpcErrorCode::NotImplemented,
            Self::ShuttingDown => RpcErrorCode::ShuttingDown,
        }
    }

    /// Wire form of this error.
    pub fn to_method_error(&self) -> MethodError {
        MethodError {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Stable error codes surfaced to control-channel callers.
///
/// Use `to_string()` (Display) to produce the canonical code string.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    #[error("PERMISSION")]
    Permission,
    #[error("ENGINE_UNAVAILABLE")]
    EngineUnavailable,
    #[error("ENGINE_INVALID")]
    EngineInvalid,
    #[error("MOVE_ERROR")]
    MoveError,
    #[error("METHOD_ERROR")]
    MethodError,
    #[error("INVALID_ARGS")]
    InvalidArgs,
    #[error("NOT_IMPLEMENTED")]
    NotImplemented,
    #[error("SHUTTING_DOWN")]
    ShuttingDown,
}
