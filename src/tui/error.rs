//! Terminal-layer error types
//!
//! Errors for viewer operations that take row or column indices. All of them
//! are recoverable; the terminal layer has no panic paths.

use std::fmt;

/// Error from a grid or detail view operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiError {
    /// No rows are displayed
    NoRows,
    /// Row index outside the displayed rows
    RowOutOfBounds {
        /// Requested row index
        requested: usize,
        /// Displayed row count
        total: usize,
    },
    /// Column index outside the headers
    ColumnOutOfBounds {
        /// Requested column index
        requested: usize,
        /// Header count
        total: usize,
    },
}

impl fmt::Display for TuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows => write!(f, "No rows to show"),
            Self::RowOutOfBounds { requested, total } => {
                write!(f, "Row index {requested} out of bounds (showing {total})")
            }
            Self::ColumnOutOfBounds { requested, total } => {
                write!(f, "Column index {requested} out of bounds (total: {total})")
            }
        }
    }
}

impl std::error::Error for TuiError {}

/// Result type for terminal-layer operations
pub type TuiResult<T> = Result<T, TuiError>;
