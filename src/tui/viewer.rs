//! Grid viewer for terminal display
//!
//! A searchable table over a canonical table. The query is kept as typed and
//! the displayed rows are recomputed from the full row set on every change;
//! display indices are positions in that filtered sequence.

use unicode_width::UnicodeWidthStr;

use super::error::{TuiError, TuiResult};
use super::format::{center, pad_right, single_line, truncate_string, wrap_text};
use super::scroll::ScrollState;
use super::{line_texts, Line, LineStyle};
use crate::filter::matching_indices;
use crate::grid::{self, display_value, ColumnLayout, DisplayCell, DisplayModel};
use crate::normalize::{CanonicalRow, CanonicalTable};
use crate::route::Route;
use crate::selection::{select, SnapshotStore};

/// Rows sampled when sizing columns
const SAMPLE_ROWS: usize = 200;
/// Widest a narrow column grows from its content
const MAX_NARROW_WIDTH: u16 = 24;
/// Widest a wrapping column grows from its content
const MAX_WIDE_WIDTH: u16 = 48;
/// Narrowest a wrapping column gets before scaling
const MIN_WIDE_WIDTH: u16 = 16;
/// Narrowest any column gets
const MIN_WIDTH: u16 = 3;
/// Focus marker column
const MARKER_WIDTH: u16 = 2;
/// Lines a row may take at most when its wide cells wrap
const MAX_ROW_LINES: usize = 4;

/// A scrollable, filterable table view
///
/// # Example
///
/// ```
/// use sheetgrid::tui::GridViewer;
/// use sheetgrid::{normalize, RawPayload};
///
/// let payload = RawPayload::from_json_str(
///     r#"[{"ID":"1","Name":"Widget"},{"ID":"2","Name":"Gadget"}]"#,
/// ).unwrap();
/// let mut viewer = GridViewer::new(normalize(&payload, true));
/// viewer.set_query("gadget");
/// assert_eq!(viewer.row_count(), 1);
/// assert_eq!(viewer.footer(), "Showing 1 rows");
/// ```
#[derive(Debug, Clone)]
pub struct GridViewer {
    table: CanonicalTable,
    query: String,
    /// Positions in `table.rows` of the displayed rows
    visible: Vec<usize>,
    layouts: Vec<ColumnLayout>,
    column_widths: Vec<u16>,
    scroll: ScrollState,
    width: u16,
    height: u16,
}

impl GridViewer {
    /// Create a viewer with default dimensions
    pub fn new(table: CanonicalTable) -> Self {
        Self::with_dimensions(table, 80, 24)
    }

    /// Create a viewer drawing into `width` x `height` cells
    pub fn with_dimensions(table: CanonicalTable, width: u16, height: u16) -> Self {
        let layouts = table
            .headers
            .iter()
            .map(|h| ColumnLayout::for_header(h))
            .collect();
        let visible: Vec<usize> = (0..table.rows.len()).collect();
        let scroll = ScrollState::new(visible.len(), 1);

        let mut viewer = Self {
            table,
            query: String::new(),
            visible,
            layouts,
            column_widths: Vec::new(),
            scroll,
            width,
            height,
        };
        viewer.set_dimensions(width, height);
        viewer
    }

    /// Update dimensions; recomputes column widths and keeps focus visible
    pub fn set_dimensions(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.column_widths = self.calculate_column_widths();
        self.refit();
    }

    /// The canonical table
    #[inline]
    pub fn table(&self) -> &CanonicalTable {
        &self.table
    }

    /// Column headers
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    /// Current query, as typed
    #[inline]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query and re-filter from the full row set
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.visible = matching_indices(&self.table.rows, &self.query);
        self.scroll.reset(self.visible.len());
        self.refit();
    }

    /// Append a character to the query
    pub fn push_query_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query);
    }

    /// Remove the last character of the query
    pub fn pop_query_char(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    /// Clear the query
    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    /// Number of displayed rows
    #[inline]
    pub fn row_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of rows before filtering
    #[inline]
    pub fn total_row_count(&self) -> usize {
        self.table.rows.len()
    }

    /// Whether nothing is displayed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Displayed row at `index`
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::RowOutOfBounds`] past the displayed rows.
    pub fn displayed_row(&self, index: usize) -> TuiResult<&CanonicalRow> {
        self.visible
            .get(index)
            .and_then(|&i| self.table.rows.get(i))
            .ok_or(TuiError::RowOutOfBounds {
                requested: index,
                total: self.visible.len(),
            })
    }

    /// Displayed rows, borrowed from the canonical table
    pub fn displayed_rows(&self) -> Vec<&CanonicalRow> {
        self.visible
            .iter()
            .filter_map(|&i| self.table.rows.get(i))
            .collect()
    }

    /// Display model of the displayed rows
    pub fn display_model(&self) -> DisplayModel {
        grid::render(
            &self.table.headers,
            self.displayed_rows(),
            self.table.top_row.as_deref(),
        )
    }

    /// Display cell at (`row`, `col`) of the displayed rows
    ///
    /// # Errors
    ///
    /// Returns an out-of-bounds error for a bad row or column.
    pub fn cell(&self, row: usize, col: usize) -> TuiResult<DisplayCell> {
        let header = self
            .table
            .headers
            .get(col)
            .ok_or(TuiError::ColumnOutOfBounds {
                requested: col,
                total: self.table.headers.len(),
            })?;
        let value = self.displayed_row(row)?.value(col, header);
        Ok(DisplayCell {
            text: display_value(value),
            title: grid::raw_value(value),
        })
    }

    /// Column widths in terminal cells
    #[inline]
    pub fn column_widths(&self) -> &[u16] {
        &self.column_widths
    }

    /// Focused display index
    #[inline]
    pub fn focused(&self) -> Option<usize> {
        self.scroll.focus()
    }

    /// First display index on screen
    #[inline]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// Focus a display index
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::RowOutOfBounds`] past the displayed rows.
    pub fn set_focus(&mut self, index: usize) -> TuiResult<()> {
        if index >= self.visible.len() {
            return Err(TuiError::RowOutOfBounds {
                requested: index,
                total: self.visible.len(),
            });
        }
        self.scroll.set_focus(index);
        self.refit();
        Ok(())
    }

    /// Move focus down one row
    pub fn focus_next(&mut self) {
        self.scroll.focus_next();
        self.refit();
    }

    /// Move focus up one row
    pub fn focus_prev(&mut self) {
        self.scroll.focus_prev();
        self.refit();
    }

    /// Move focus down one page
    pub fn page_down(&mut self) {
        self.scroll.page_down();
        self.refit();
    }

    /// Move focus up one page
    pub fn page_up(&mut self) {
        self.scroll.page_up();
        self.refit();
    }

    /// Focus the first row
    pub fn home(&mut self) {
        self.scroll.home();
        self.refit();
    }

    /// Focus the last row
    pub fn end(&mut self) {
        self.scroll.end();
        self.refit();
    }

    /// Activate the focused row: hand it off and return the detail route
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::NoRows`] when no row is displayed.
    pub fn activate<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> TuiResult<Route> {
        let index = self.scroll.focus().ok_or(TuiError::NoRows)?;
        self.activate_index(store, index)
    }

    /// Activate the displayed row at `index`
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::RowOutOfBounds`] past the displayed rows.
    pub fn activate_index<S: SnapshotStore + ?Sized>(
        &self,
        store: &mut S,
        index: usize,
    ) -> TuiResult<Route> {
        let row = self.displayed_row(index)?;
        Ok(select(
            store,
            index,
            row,
            &self.table.headers,
            self.table.top_row.as_deref(),
        ))
    }

    /// Footer under the table
    pub fn footer(&self) -> String {
        format!("Showing {} rows", self.row_count())
    }

    /// Count shown next to the search input
    pub fn search_summary(&self) -> String {
        format!(
            "Showing {} of {} rows",
            self.row_count(),
            self.total_row_count()
        )
    }

    /// Full raw values of the focused row, for the status bar
    pub fn status_line(&self) -> String {
        let Some(row) = self.scroll.focus().and_then(|i| self.displayed_row(i).ok()) else {
            return String::new();
        };
        let values: Vec<String> = self
            .table
            .headers
            .iter()
            .enumerate()
            .filter_map(|(col, header)| {
                let raw = grid::raw_value(row.value(col, header));
                (!raw.trim().is_empty()).then(|| format!("{header}: {raw}"))
            })
            .collect();
        truncate_string(&values.join(" | "), usize::from(self.width))
    }

    /// Flat top row line, if the table has one
    pub fn top_row_line(&self) -> Option<String> {
        let top = self.table.top_row.as_ref()?;
        let text: Vec<String> = top.iter().map(ToString::to_string).collect();
        Some(truncate_string(&text.join("  "), usize::from(self.width)))
    }

    /// Header line, upper-cased and aligned to the columns
    pub fn render_header_line(&self) -> String {
        let cells: Vec<String> = self
            .table
            .headers
            .iter()
            .zip(&self.layouts)
            .zip(&self.column_widths)
            .map(|((header, layout), &w)| {
                let upper = header.to_uppercase();
                match layout {
                    ColumnLayout::WideWrap => pad_right(&upper, usize::from(w)),
                    ColumnLayout::NarrowCentered => center(&upper, usize::from(w)),
                }
            })
            .collect();
        format!("{}{}", " ".repeat(usize::from(MARKER_WIDTH)), cells.join(" "))
    }

    /// Terminal lines of the displayed row at `index`
    ///
    /// Wrapping cells spread over several lines; other cells sit on the first.
    pub fn row_lines(&self, index: usize) -> Vec<String> {
        let Ok(row) = self.displayed_row(index) else {
            return Vec::new();
        };
        let focused = self.scroll.focus() == Some(index);

        let columns: Vec<Vec<String>> = grid::render_row(&self.table.headers, row)
            .into_iter()
            .zip(&self.layouts)
            .zip(&self.column_widths)
            .map(|((cell, layout), &w)| {
                let w = usize::from(w);
                match layout {
                    ColumnLayout::WideWrap => {
                        let mut lines = wrap_text(&cell.text, w);
                        if lines.len() > MAX_ROW_LINES {
                            lines.truncate(MAX_ROW_LINES);
                            if let Some(last) = lines.last_mut() {
                                *last = truncate_string(&format!("{last} ..."), w);
                            }
                        }
                        lines.into_iter().map(|l| pad_right(&l, w)).collect()
                    }
                    ColumnLayout::NarrowCentered => vec![center(&cell.text, w)],
                }
            })
            .collect();

        let height = columns.iter().map(Vec::len).max().unwrap_or(1).max(1);
        (0..height)
            .map(|line| {
                let marker = if focused && line == 0 { "> " } else { "  " };
                let cells: Vec<String> = columns
                    .iter()
                    .zip(&self.column_widths)
                    .map(|(lines, &w)| {
                        lines
                            .get(line)
                            .cloned()
                            .unwrap_or_else(|| " ".repeat(usize::from(w)))
                    })
                    .collect();
                format!("{marker}{}", cells.join(" ").trim_end())
            })
            .collect()
    }

    /// Height in lines of the displayed row at `index`
    pub fn row_height(&self, index: usize) -> usize {
        let Ok(row) = self.displayed_row(index) else {
            return 1;
        };
        self.table
            .headers
            .iter()
            .enumerate()
            .zip(&self.layouts)
            .zip(&self.column_widths)
            .filter(|((_, layout), _)| layout.is_wide())
            .map(|(((col, header), _), &w)| {
                let text = display_value(row.value(col, header));
                wrap_text(&text, usize::from(w)).len().min(MAX_ROW_LINES)
            })
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Lines available for rows
    fn body_lines(&self) -> usize {
        let fixed = 3 + usize::from(self.table.top_row.is_some());
        usize::from(self.height).saturating_sub(fixed).max(1)
    }

    /// Styled lines: top row, header, rule, rows from the scroll offset, footer
    pub fn render(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(usize::from(self.height));
        if let Some(top) = self.top_row_line() {
            lines.push(Line::new(LineStyle::Dim, top));
        }
        lines.push(Line::new(LineStyle::Header, self.render_header_line()));
        lines.push(Line::plain("-".repeat(usize::from(self.width))));

        let budget = self.body_lines();
        let mut used = 0;
        for index in self.scroll.offset()..self.visible.len() {
            if used >= budget {
                break;
            }
            let style = if self.scroll.focus() == Some(index) {
                LineStyle::Focused
            } else {
                LineStyle::Plain
            };
            for text in self.row_lines(index).into_iter().take(budget - used) {
                lines.push(Line::new(style, text));
                used += 1;
            }
        }
        if self.visible.is_empty() {
            lines.push(Line::new(LineStyle::Dim, "  No matching rows."));
        }

        lines.push(Line::new(LineStyle::Dim, self.footer()));
        lines
    }

    /// Rendered lines as text
    pub fn render_lines(&self) -> Vec<String> {
        line_texts(&self.render())
    }

    /// Recompute the scroll offset so the focused row fits on screen
    fn refit(&mut self) {
        let body = self.body_lines();
        self.scroll.set_page(body);
        let Some(focus) = self.scroll.focus() else {
            return;
        };
        let start = self.scroll.offset().min(focus);
        let heights: Vec<usize> = (start..=focus).map(|i| self.row_height(i)).collect();
        self.scroll.fit_to_lines(body, |i| {
            i.checked_sub(start)
                .and_then(|k| heights.get(k))
                .copied()
                .unwrap_or(1)
        });
    }

    /// Column widths from header and sampled content widths, scaled to the
    /// terminal; wrapping columns take any space left over
    fn calculate_column_widths(&self) -> Vec<u16> {
        let count = self.table.headers.len();
        if count == 0 {
            return Vec::new();
        }

        let mut widths: Vec<u16> = self
            .table
            .headers
            .iter()
            .map(|h| u16::try_from(UnicodeWidthStr::width(h.as_str())).unwrap_or(u16::MAX))
            .collect();

        for row in self.table.rows.iter().take(SAMPLE_ROWS) {
            for (col, header) in self.table.headers.iter().enumerate() {
                let text = display_value(row.value(col, header));
                let width =
                    u16::try_from(UnicodeWidthStr::width(single_line(&text).as_ref())).unwrap_or(u16::MAX);
                if let Some(w) = widths.get_mut(col) {
                    *w = (*w).max(width);
                }
            }
        }

        for (w, layout) in widths.iter_mut().zip(&self.layouts) {
            *w = match layout {
                ColumnLayout::WideWrap => (*w).clamp(MIN_WIDE_WIDTH, MAX_WIDE_WIDTH),
                ColumnLayout::NarrowCentered => (*w).clamp(MIN_WIDTH, MAX_NARROW_WIDTH),
            };
        }

        let separators = u16::try_from(count - 1).unwrap_or(u16::MAX);
        let available = self
            .width
            .saturating_sub(MARKER_WIDTH)
            .saturating_sub(separators);

        let total: u32 = widths.iter().map(|&w| u32::from(w)).sum();
        if total > u32::from(available) && available > 0 {
            let scale = f64::from(available) / f64::from(total);
            for w in &mut widths {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let scaled = (f64::from(*w) * scale) as u16;
                *w = scaled.max(MIN_WIDTH);
            }
        } else if let Ok(total) = u16::try_from(total) {
            let wide: Vec<usize> = (0..count)
                .filter(|&i| self.layouts.get(i).is_some_and(|l| l.is_wide()))
                .collect();
            if !wide.is_empty() {
                let spare = available.saturating_sub(total);
                let share = spare / u16::try_from(wide.len()).unwrap_or(u16::MAX);
                for i in wide {
                    if let Some(w) = widths.get_mut(i) {
                        *w = w.saturating_add(share);
                    }
                }
            }
        }

        widths
    }
}
