//! Grid display model
//!
//! Produces what the table shows, independent of any terminal: a layout class
//! per column, a display string per cell, and the flat top row line.

use serde::Serialize;

use crate::normalize::CanonicalRow;
use crate::payload::Scalar;

/// Shown for absent and blank cells.
pub const PLACEHOLDER: &str = "-";

/// Layout policy of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnLayout {
    /// Description-like column: wide, text wraps
    WideWrap,
    /// Everything else: narrow, single line, centered
    NarrowCentered,
}

impl ColumnLayout {
    /// Layout for a header name
    ///
    /// Headers containing `name` (which covers `item name`), in any case, are
    /// description columns.
    pub fn for_header(header: &str) -> Self {
        if header.to_lowercase().contains("name") {
            Self::WideWrap
        } else {
            Self::NarrowCentered
        }
    }

    /// Whether the column wraps
    #[inline]
    pub fn is_wide(self) -> bool {
        matches!(self, Self::WideWrap)
    }
}

/// Display string for a cell: its text, or [`PLACEHOLDER`] when absent or blank.
pub fn display_value(value: Option<&Scalar>) -> String {
    match value {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Raw string form of a cell, `""` when absent.
pub fn raw_value(value: Option<&Scalar>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// A column of the display model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayColumn {
    /// Header text
    pub header: String,
    /// Layout policy
    pub layout: ColumnLayout,
}

/// A rendered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayCell {
    /// What the grid shows
    pub text: String,
    /// Full raw value, for hover/status display
    pub title: String,
}

/// A rendered row, tied to its index in the displayed sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Index in the displayed (filtered) rows; the selection argument
    pub index: usize,
    /// One cell per column
    pub cells: Vec<DisplayCell>,
}

/// Everything needed to draw the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    /// Columns in header order
    pub columns: Vec<DisplayColumn>,
    /// Stringified top row, shown once above the table
    pub top_row: Option<Vec<String>>,
    /// Displayed rows
    pub rows: Vec<DisplayRow>,
}

impl DisplayModel {
    /// Row count shown to the user; excludes top and header rows
    #[inline]
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Footer text under the table
    pub fn footer(&self) -> String {
        format!("Showing {} rows", self.total_rows())
    }
}

/// Display cells for one row, cut or padded to the header count
pub fn render_row(headers: &[String], row: &CanonicalRow) -> Vec<DisplayCell> {
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let value = row.value(col, header);
            DisplayCell {
                text: display_value(value),
                title: raw_value(value),
            }
        })
        .collect()
}

/// Build the display model for the given (already filtered) rows.
pub fn render<'a, I>(headers: &[String], rows: I, top_row: Option<&[Scalar]>) -> DisplayModel
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let columns = headers
        .iter()
        .map(|header| DisplayColumn {
            header: header.clone(),
            layout: ColumnLayout::for_header(header),
        })
        .collect();

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| DisplayRow {
            index,
            cells: render_row(headers, row),
        })
        .collect();

    DisplayModel {
        columns,
        top_row: top_row.map(|cells| cells.iter().map(ToString::to_string).collect()),
        rows,
    }
}
