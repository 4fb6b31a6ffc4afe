//! Error types
//!
//! Request-time failures are converted into HTTP responses at the shell
//! boundary; startup failures propagate out of `main`.

use std::io;
use std::path::PathBuf;

use hyper::{Method, StatusCode};
use thiserror::Error;

use crate::routing::PatternError;

/// Errors produced while setting up or serving the dev server
#[derive(Debug, Error)]
pub enum DevServerError {
    /// No registered route matches method + path
    #[error("Cannot {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// The resolved filesystem path (or its index fallback) does not exist
    #[error("File not found: {url} (local file: {})", path.display())]
    ContentNotFound { url: String, path: PathBuf },

    /// Any other filesystem failure while resolving or reading content
    #[error("Failed to access {}: {source}", path.display())]
    ContentAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed route pattern
    #[error(transparent)]
    PatternCompile(#[from] PatternError),

    /// Configuration could not be loaded or resolved
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid listen address
    #[error("Invalid listen address '{0}'")]
    Address(String),

    /// Socket level I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure reported by a custom handler
    #[error("Handler error: {0}")]
    Handler(String),
}

impl DevServerError {
    /// HTTP status this error is reported with
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } | Self::ContentNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short error code surfaced in 500 bodies
    pub fn code(&self) -> String {
        match self {
            Self::ContentAccess { source, .. } | Self::Io(source) => io_error_code(source),
            Self::PatternCompile(_) => "EPATTERN".to_string(),
            Self::Config(_) => "ECONFIG".to_string(),
            Self::Address(_) => "EADDR".to_string(),
            Self::Handler(_) => "EHANDLER".to_string(),
            Self::RouteNotFound { .. } | Self::ContentNotFound { .. } => "ENOENT".to_string(),
        }
    }
}

/// Render an I/O error as its kind plus the raw OS error when present
pub fn io_error_code(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(errno) => format!("{:?} (os error {errno})", err.kind()),
        None => format!("{:?}", err.kind()),
    }
}

/// Convenient Result type for dev server operations
pub type DevResult<T> = Result<T, DevServerError>;
