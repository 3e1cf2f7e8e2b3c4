//! Error types for the console.

use std::io;
use std::path::PathBuf;

use backoffice_view::ViewError;
use thiserror::Error;

/// Errors raised by the console around the view engine.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Invalid view configuration (path, page size, sort spec).
    #[error(transparent)]
    View(#[from] ViewError),

    /// Screen name not recognised.
    #[error("unknown screen '{0}' (try `backoffice screens`)")]
    UnknownScreen(String),

    /// API payload was neither a list, a keyed map, nor a `data` envelope.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// Command line value could not be interpreted.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Configuration file is unreadable or inconsistent.
    #[error("config error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// JSON decoding or encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File or stream I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConsoleError {
    /// Create an invalid argument error.
    pub fn argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
