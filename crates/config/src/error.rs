//! Error types for settings loading.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
/// Errors produced while loading or parsing a settings file.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON parse error with a 1-based location.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
    },
    #[error("{0}")]
    /// A setting value is outside its accepted range.
    Invalid(String),
}

impl Error {
    /// Render a human-friendly error message including location when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
            } => match path {
                Some(p) => format!(
                    "Settings parse error at {}:{}:{}: {}",
                    p.display(),
                    line,
                    col,
                    message
                ),
                None => format!(
                    "Settings parse error at line {}, column {}: {}",
                    line, col, message
                ),
            },
            Self::Invalid(message) => format!("Invalid setting: {}", message),
        }
    }

    /// Attach a path to a parse or read error that was produced without one.
    pub(crate) fn with_path(self, p: PathBuf) -> Self {
        match self {
            Self::Read { message, .. } => Self::Read {
                path: Some(p),
                message,
            },
            Self::Parse {
                line, col, message, ..
            } => Self::Parse {
                path: Some(p),
                line,
                col,
                message,
            },
            other => other,
        }
    }
}

impl From<ron::error::SpannedError> for Error {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Parse {
            path: None,
            line: err.span.start.line,
            col: err.span.start.col,
            message: err.code.to_string(),
        }
    }
}
