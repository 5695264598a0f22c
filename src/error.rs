//! Error types for sheetgrid.

use std::path::PathBuf;

/// Result type alias for sheetgrid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, parsing or handing off sheet data.
///
/// Malformed cells are never errors: they degrade to placeholder values during
/// normalization and rendering.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON error while encoding or decoding payloads and snapshots.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source could not be fetched, or returned something that is not CSV.
    #[error("Source unavailable ({url}): {reason}")]
    SourceUnavailable {
        /// The URL or path that was tried.
        url: String,
        /// Why the source was rejected.
        reason: String,
    },

    /// Transient selection storage rejected a read or write.
    #[error("Storage unavailable: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A grid or detail view was asked for a row or column it does not show.
    #[error(transparent)]
    View(#[from] crate::tui::TuiError),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {message}")]
    Terminal {
        /// Description of the terminal failure.
        message: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a source-unavailable error.
    pub fn source_unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a terminal error.
    pub fn terminal(message: impl std::fmt::Display) -> Self {
        Self::Terminal {
            message: message.to_string(),
        }
    }

    /// Whether this error means the source document itself could not be used.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}
