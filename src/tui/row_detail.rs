//! Detail view of a selected row
//!
//! Built only from the selection snapshot in the store: the top row, then a
//! two-column label/value list in header order. Nothing is refetched or
//! renormalized. Without a readable snapshot the view shows an explicit
//! empty state with a way back.

use super::format::{pad_right, truncate_string, wrap_text};
use super::scroll::ScrollState;
use super::{line_texts, Line, LineStyle};
use crate::grid::display_value;
use crate::selection::{load_snapshot, SelectionSnapshot, SnapshotStore};

/// Body of the empty state
pub const NO_ROW_SELECTED: &str = "No row selected.";
/// Action offered by the empty state
pub const GO_BACK: &str = "Go back (Esc)";

/// Label/value view of one selected row
///
/// # Example
///
/// ```
/// use sheetgrid::selection::{select, SessionStore};
/// use sheetgrid::tui::DetailView;
/// use sheetgrid::{normalize, RawPayload};
///
/// let payload = RawPayload::from_json_str(r#"[["ID","Name"],["1","Widget"]]"#).unwrap();
/// let table = normalize(&payload, true);
/// let mut store = SessionStore::new();
/// select(&mut store, 0, &table.rows[0], &table.headers, table.top_row.as_deref());
///
/// let view = DetailView::load(&store, 0);
/// assert_eq!(view.loaded().and_then(|v| v.field_value("Name")), Some("Widget"));
/// ```
#[derive(Debug, Clone)]
pub struct RowDetailView {
    index: usize,
    /// (label, display value) in header order
    fields: Vec<(String, String)>,
    top_row: Option<Vec<String>>,
    scroll: ScrollState,
    width: u16,
    height: u16,
}

impl RowDetailView {
    /// Build the view for the row at display `index` from its snapshot
    pub fn from_snapshot(index: usize, snapshot: &SelectionSnapshot) -> Self {
        Self::with_dimensions(index, snapshot, 80, 24)
    }

    /// Build the view with specific dimensions
    pub fn with_dimensions(
        index: usize,
        snapshot: &SelectionSnapshot,
        width: u16,
        height: u16,
    ) -> Self {
        let fields = snapshot
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                (header.clone(), display_value(snapshot.row.value(col, header)))
            })
            .collect();
        let top_row = snapshot
            .top_row
            .as_ref()
            .map(|cells| cells.iter().map(ToString::to_string).collect());

        let mut view = Self {
            index,
            fields,
            top_row,
            scroll: ScrollState::default(),
            width,
            height,
        };
        view.set_dimensions(width, height);
        view
    }

    /// Update dimensions and re-wrap
    pub fn set_dimensions(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let offset = self.scroll.offset();
        self.scroll = ScrollState::new(self.all_lines().len(), usize::from(height));
        for _ in 0..offset {
            self.scroll.scroll_down();
        }
    }

    /// Display index the row had when selected
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of fields (one per header)
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether the snapshot had no headers
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display value of the first field labelled `name`
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Label and display value of the field at `index`
    pub fn field_by_index(&self, index: usize) -> Option<(&str, &str)> {
        self.fields
            .get(index)
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Stringified top row
    pub fn top_row(&self) -> Option<&[String]> {
        self.top_row.as_deref()
    }

    /// Scroll down one line
    pub fn scroll_down(&mut self) {
        self.scroll.scroll_down();
    }

    /// Scroll up one line
    pub fn scroll_up(&mut self) {
        self.scroll.scroll_up();
    }

    /// Scroll down one page
    pub fn page_down(&mut self) {
        self.scroll.scroll_page_down();
    }

    /// Scroll up one page
    pub fn page_up(&mut self) {
        self.scroll.scroll_page_up();
    }

    /// First line on screen
    #[inline]
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    fn label_width(&self) -> usize {
        let longest = self
            .fields
            .iter()
            .map(|(n, _)| super::format::display_width(n))
            .max()
            .unwrap_or(0)
            .max("Column".len());
        longest.min(usize::from(self.width) / 3).max(1)
    }

    /// Every line of the view, before scrolling
    fn all_lines(&self) -> Vec<Line> {
        let width = usize::from(self.width);
        let mut lines = vec![Line::new(LineStyle::Header, "Selected Row"), Line::plain("")];

        if let Some(top) = &self.top_row {
            lines.push(Line::new(LineStyle::Header, "Top Row"));
            lines.push(Line::new(LineStyle::Dim, truncate_string(&top.join("   "), width)));
            lines.push(Line::plain(""));
        }

        let label_w = self.label_width();
        let value_w = width.saturating_sub(label_w + 2).max(1);
        lines.push(Line::new(
            LineStyle::Header,
            format!("{}  Value", pad_right("Column", label_w)),
        ));

        for (label, value) in &self.fields {
            let label_lines = wrap_text(label, label_w);
            let value_lines = wrap_text(value, value_w);
            let height = label_lines.len().max(value_lines.len());
            for i in 0..height {
                let l = label_lines.get(i).map_or("", String::as_str);
                let v = value_lines.get(i).map_or("", String::as_str);
                let text = format!("{}  {v}", pad_right(l, label_w));
                lines.push(Line::plain(text.trim_end()));
            }
        }
        lines
    }

    /// Styled lines on screen
    pub fn render(&self) -> Vec<Line> {
        self.all_lines()
            .into_iter()
            .skip(self.scroll.offset())
            .take(usize::from(self.height))
            .collect()
    }

    /// Lines on screen as text
    pub fn render_lines(&self) -> Vec<String> {
        line_texts(&self.render())
    }
}

/// What the detail route shows
#[derive(Debug, Clone)]
pub enum DetailView {
    /// A snapshot was read back
    Loaded(RowDetailView),
    /// Nothing stored, or the stored value is unreadable
    NoRowSelected {
        /// Index from the route
        index: usize,
    },
}

impl DetailView {
    /// Read the selection slot and build the view for route `index`
    pub fn load<S: SnapshotStore + ?Sized>(store: &S, index: usize) -> Self {
        Self::load_with_dimensions(store, index, 80, 24)
    }

    /// Read the selection slot with specific dimensions
    pub fn load_with_dimensions<S: SnapshotStore + ?Sized>(
        store: &S,
        index: usize,
        width: u16,
        height: u16,
    ) -> Self {
        match load_snapshot(store) {
            Some(snapshot) => {
                Self::Loaded(RowDetailView::with_dimensions(index, &snapshot, width, height))
            }
            None => Self::NoRowSelected { index },
        }
    }

    /// The loaded view, if any
    pub fn loaded(&self) -> Option<&RowDetailView> {
        match self {
            Self::Loaded(view) => Some(view),
            Self::NoRowSelected { .. } => None,
        }
    }

    /// Whether a snapshot was loaded
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Update dimensions
    pub fn set_dimensions(&mut self, width: u16, height: u16) {
        if let Self::Loaded(view) = self {
            view.set_dimensions(width, height);
        }
    }

    /// Scroll down one line
    pub fn scroll_down(&mut self) {
        if let Self::Loaded(view) = self {
            view.scroll_down();
        }
    }

    /// Scroll up one line
    pub fn scroll_up(&mut self) {
        if let Self::Loaded(view) = self {
            view.scroll_up();
        }
    }

    /// Scroll down one page
    pub fn page_down(&mut self) {
        if let Self::Loaded(view) = self {
            view.page_down();
        }
    }

    /// Scroll up one page
    pub fn page_up(&mut self) {
        if let Self::Loaded(view) = self {
            view.page_up();
        }
    }

    /// Styled lines on screen
    pub fn render(&self) -> Vec<Line> {
        match self {
            Self::Loaded(view) => view.render(),
            Self::NoRowSelected { .. } => vec![
                Line::plain(NO_ROW_SELECTED),
                Line::plain(""),
                Line::new(LineStyle::Bar, format!("[ {GO_BACK} ]")),
            ],
        }
    }

    /// Lines on screen as text
    pub fn render_lines(&self) -> Vec<String> {
        line_texts(&self.render())
    }
}
