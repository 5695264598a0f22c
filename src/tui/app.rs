//! Terminal application state
//!
//! Owns the load state, the route stack and the selection store, and maps key
//! events onto the grid and detail views. Drawing is left to the caller, which
//! receives styled lines from [`App::render`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::row_detail::DetailView;
use super::viewer::GridViewer;
use super::{line_texts, Line, LineStyle};
use crate::error::Result;
use crate::normalize::normalize;
use crate::payload::RawPayload;
use crate::route::Route;
use crate::selection::SnapshotStore;

/// Key hints for the grid route
const GRID_HINTS: &str = "Up/Down move  Enter open  / search  q quit";
/// Key hints for the detail route
const DETAIL_HINTS: &str = "Esc back  Up/Down scroll  q quit";

/// Where the initial fetch stands
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Fetch in flight
    Pending,
    /// Fetch or parse failed; the message is shown in place of the table
    Failed(String),
    /// The source held no rows
    Empty,
    /// Table ready
    Ready(Box<GridViewer>),
}

/// How typed characters are interpreted on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys navigate
    #[default]
    Normal,
    /// Keys edit the query
    Search,
}

/// The terminal client
#[derive(Debug)]
pub struct App<S> {
    store: S,
    source: String,
    state: LoadState,
    routes: Vec<Route>,
    detail: Option<DetailView>,
    mode: InputMode,
    width: u16,
    height: u16,
    should_quit: bool,
}

impl<S: SnapshotStore> App<S> {
    /// Create an app waiting for `source` to load
    pub fn new(store: S, source: impl Into<String>) -> Self {
        Self::with_dimensions(store, source, 80, 24)
    }

    /// Create an app with specific dimensions
    pub fn with_dimensions(store: S, source: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            store,
            source: source.into(),
            state: LoadState::Pending,
            routes: vec![Route::Grid],
            detail: None,
            mode: InputMode::Normal,
            width,
            height,
            should_quit: false,
        }
    }

    /// Receive the fetch result and build the grid
    pub fn finish_loading(
        &mut self,
        result: Result<RawPayload>,
        second_row_as_header: bool,
        initial_query: &str,
    ) {
        self.state = match result {
            Err(e) => {
                tracing::warn!(error = %e, "sheet failed to load");
                LoadState::Failed(e.to_string())
            }
            Ok(payload) if payload.is_empty() => LoadState::Empty,
            Ok(payload) => {
                let table = normalize(&payload, second_row_as_header);
                let mut viewer =
                    GridViewer::with_dimensions(table, self.width, self.grid_height());
                if !initial_query.is_empty() {
                    viewer.set_query(initial_query);
                }
                LoadState::Ready(Box::new(viewer))
            }
        };
    }

    /// Current load state
    #[inline]
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// The grid, once loaded
    pub fn viewer(&self) -> Option<&GridViewer> {
        match &self.state {
            LoadState::Ready(viewer) => Some(viewer.as_ref()),
            _ => None,
        }
    }

    fn viewer_mut(&mut self) -> Option<&mut GridViewer> {
        match &mut self.state {
            LoadState::Ready(viewer) => Some(viewer.as_mut()),
            _ => None,
        }
    }

    /// The detail view, on the detail route
    #[inline]
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    /// The selection store
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current route
    pub fn route(&self) -> Route {
        self.routes.last().copied().unwrap_or_default()
    }

    /// Route stack depth
    #[inline]
    pub fn history_len(&self) -> usize {
        self.routes.len()
    }

    /// Current input mode
    #[inline]
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Whether the user asked to quit
    #[inline]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Push a route; the detail route reads the selection store
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.detail = match route {
            Route::Grid => None,
            Route::Detail { index } => Some(DetailView::load_with_dimensions(
                &self.store,
                index,
                self.width,
                self.detail_height(),
            )),
        };
        self.mode = InputMode::Normal;
        self.routes.push(route);
    }

    /// Pop the current route; the grid is never popped
    pub fn back(&mut self) {
        if self.routes.len() > 1 {
            self.routes.pop();
        }
        let route = self.route();
        tracing::debug!(%route, "back");
        self.detail = match route {
            Route::Grid => None,
            Route::Detail { index } => Some(DetailView::load_with_dimensions(
                &self.store,
                index,
                self.width,
                self.detail_height(),
            )),
        };
    }

    /// Update terminal dimensions
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let grid_height = self.grid_height();
        let detail_height = self.detail_height();
        if let Some(viewer) = self.viewer_mut() {
            viewer.set_dimensions(width, grid_height);
        }
        if let Some(detail) = &mut self.detail {
            detail.set_dimensions(width, detail_height);
        }
    }

    /// Rows for the grid: title, search and status bars take one line each
    fn grid_height(&self) -> u16 {
        self.height.saturating_sub(3)
    }

    /// Rows for the detail view: title and status bars take one line each
    fn detail_height(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    /// Handle one key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.route() {
            Route::Detail { .. } => self.handle_detail_key(key),
            Route::Grid => match self.mode {
                InputMode::Search => self.handle_search_key(key),
                InputMode::Normal => self.handle_grid_key(key),
            },
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        let Some(viewer) = self.viewer_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => viewer.focus_prev(),
            KeyCode::Down | KeyCode::Char('j') => viewer.focus_next(),
            KeyCode::PageUp => viewer.page_up(),
            KeyCode::PageDown => viewer.page_down(),
            KeyCode::Home | KeyCode::Char('g') => viewer.home(),
            KeyCode::End | KeyCode::Char('G') => viewer.end(),
            KeyCode::Esc => viewer.clear_query(),
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_focused(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                if let Some(viewer) = self.viewer_mut() {
                    viewer.pop_query_char();
                }
            }
            KeyCode::Up => {
                if let Some(viewer) = self.viewer_mut() {
                    viewer.focus_prev();
                }
            }
            KeyCode::Down => {
                if let Some(viewer) = self.viewer_mut() {
                    viewer.focus_next();
                }
            }
            KeyCode::Char(c) => {
                if let Some(viewer) = self.viewer_mut() {
                    viewer.push_query_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') => self.back(),
            _ => {
                if let Some(detail) = &mut self.detail {
                    match key.code {
                        KeyCode::Up | KeyCode::Char('k') => detail.scroll_up(),
                        KeyCode::Down | KeyCode::Char('j') => detail.scroll_down(),
                        KeyCode::PageUp => detail.page_up(),
                        KeyCode::PageDown => detail.page_down(),
                        _ => {}
                    }
                }
            }
        }
    }

    fn activate_focused(&mut self) {
        let LoadState::Ready(viewer) = &self.state else {
            return;
        };
        match viewer.activate(&mut self.store) {
            Ok(route) => self.navigate(route),
            Err(e) => tracing::debug!(error = %e, "nothing to activate"),
        }
    }

    /// Styled lines for the whole screen
    pub fn render(&self) -> Vec<Line> {
        let route = self.route();
        let mut lines = vec![Line::new(
            LineStyle::Bar,
            super::format::pad_right(
                &format!(" sheetgrid  {route}  {}", self.source),
                usize::from(self.width),
            ),
        )];

        let status = match (&self.state, route) {
            (_, Route::Detail { .. }) => {
                if let Some(detail) = &self.detail {
                    lines.extend(detail.render());
                }
                DETAIL_HINTS.to_string()
            }
            (LoadState::Pending, Route::Grid) => {
                lines.push(Line::plain("Loading…"));
                "q quit".to_string()
            }
            (LoadState::Failed(message), Route::Grid) => {
                let text = format!("Error: {message}");
                lines.push(Line::plain(super::format::single_line(&text).into_owned()));
                "q quit".to_string()
            }
            (LoadState::Empty, Route::Grid) => {
                lines.push(Line::plain("No data found."));
                "q quit".to_string()
            }
            (LoadState::Ready(viewer), Route::Grid) => {
                lines.push(self.search_bar(viewer));
                lines.extend(viewer.render());
                match viewer.status_line() {
                    s if s.is_empty() || self.mode == InputMode::Search => GRID_HINTS.to_string(),
                    s => s,
                }
            }
        };

        lines.push(Line::new(
            LineStyle::Bar,
            super::format::pad_right(&format!(" {status}"), usize::from(self.width)),
        ));
        lines
    }

    fn search_bar(&self, viewer: &GridViewer) -> Line {
        let cursor = if self.mode == InputMode::Search { "_" } else { "" };
        let text = format!(
            "Search: {}{cursor}   {}",
            viewer.query(),
            viewer.search_summary()
        );
        let style = if self.mode == InputMode::Search {
            LineStyle::Focused
        } else {
            LineStyle::Dim
        };
        Line::new(style, super::format::truncate_string(&text, usize::from(self.width)))
    }

    /// Screen lines as text
    pub fn render_lines(&self) -> Vec<String> {
        line_texts(&self.render())
    }
}
