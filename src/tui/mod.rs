//! Terminal client
//!
//! Renders the grid and detail routes as plain lines so the same views drive
//! the interactive `crossterm` loop, the `print`/`show` commands and snapshot
//! tests.
//!
//! # Architecture
//!
//! - [`GridViewer`] - searchable, focusable table over a canonical table
//! - [`DetailView`] - label/value view rebuilt from the selection snapshot
//! - [`App`] - load state, route stack and key handling
//!
//! No panic paths: index-taking operations return [`TuiResult`].
//!
//! # Example
//!
//! ```
//! use sheetgrid::tui::GridViewer;
//! use sheetgrid::{normalize, RawPayload};
//!
//! let payload = RawPayload::from_json_str(r#"[{"ID":"1","Name":"Widget"}]"#).unwrap();
//! let mut viewer = GridViewer::with_dimensions(normalize(&payload, true), 60, 10);
//! viewer.set_query("widget");
//! assert_eq!(viewer.row_count(), 1);
//! assert!(viewer.render_lines()[0].contains("NAME"));
//! ```

mod app;
mod error;
mod format;
mod row_detail;
mod scroll;
mod viewer;

pub use app::{App, InputMode, LoadState};
pub use error::{TuiError, TuiResult};
pub use format::{center, display_width, pad_right, single_line, truncate_string, wrap_text};
pub use row_detail::{DetailView, RowDetailView, GO_BACK, NO_ROW_SELECTED};
pub use scroll::ScrollState;
pub use viewer::GridViewer;

/// How a rendered line should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Ordinary text
    Plain,
    /// Column headers and field labels
    Header,
    /// The focused grid row
    Focused,
    /// Title, search and status bars
    Bar,
    /// Secondary text such as the top row and hints
    Dim,
}

/// One terminal line with its style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Drawing style
    pub style: LineStyle,
    /// Text, already fitted to the width
    pub text: String,
}

impl Line {
    /// Creates a line.
    pub fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    /// Creates a plain line.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Plain, text)
    }
}

/// Text of styled lines
pub fn line_texts(lines: &[Line]) -> Vec<String> {
    lines.iter().map(|l| l.text.clone()).collect()
}
