//! Grid Snapshot Tests
//!
//! Tests for terminal rendering of the grid and detail views. These capture
//! the rendered lines and verify them against expectations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sheetgrid::selection::{SessionStore, SnapshotStore};
use sheetgrid::tui::{App, DetailView, GridViewer, LoadState, ScrollState, NO_ROW_SELECTED};
use sheetgrid::{normalize, CanonicalTable, RawPayload, Route};

// ============================================================================
// Test Helpers
// ============================================================================

fn keyed_table(rows: usize) -> CanonicalTable {
    let records: Vec<String> = (0..rows)
        .map(|i| format!(r#"{{"ID":"{i}","Name":"Item {i} Description","Price":"{}"}}"#, i * 100))
        .collect();
    let payload = RawPayload::from_json_str(&format!("[{}]", records.join(","))).unwrap();
    normalize(&payload, true)
}

fn annotated_table() -> CanonicalTable {
    let payload = RawPayload::from_json_str(
        r#"[["TopA","TopB"],["ID","Name"],["1","Widget"],["2",""]]"#,
    )
    .unwrap();
    normalize(&payload, true)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

// ============================================================================
// GridViewer Snapshot Tests
// ============================================================================

#[test]
fn test_viewer_render_header() {
    let viewer = GridViewer::with_dimensions(keyed_table(10), 80, 10);
    let header = viewer.render_header_line();

    assert!(header.contains("ID"));
    assert!(header.contains("NAME"));
    assert!(header.contains("PRICE"));
}

#[test]
fn test_viewer_render_first_row_is_focused() {
    let viewer = GridViewer::with_dimensions(keyed_table(10), 80, 10);
    let first = viewer.row_lines(0);

    assert_eq!(first.len(), 1);
    assert!(first[0].starts_with("> "));
    assert!(first[0].contains("Item 0 Description"));
    assert!(viewer.row_lines(1)[0].starts_with("  "));
}

#[test]
fn test_viewer_render_lines_fit_height() {
    let viewer = GridViewer::with_dimensions(keyed_table(100), 80, 10);
    let lines = viewer.render_lines();

    // header + rule + 7 rows + footer
    assert_eq!(lines.len(), 10);
    assert_eq!(lines.last().map(String::as_str), Some("Showing 100 rows"));
}

#[test]
fn test_viewer_top_row_renders_above_header() {
    let viewer = GridViewer::with_dimensions(annotated_table(), 60, 10);
    let lines = viewer.render_lines();

    assert_eq!(lines[0], "TopA  TopB");
    assert!(lines[1].contains("NAME"));
    assert!(lines[2].chars().all(|c| c == '-'));
}

#[test]
fn test_viewer_blank_cell_shows_placeholder() {
    let viewer = GridViewer::with_dimensions(annotated_table(), 60, 10);
    let cell = viewer.cell(1, 1).unwrap();

    assert_eq!(cell.text, "-");
    let row = &viewer.row_lines(1)[0];
    assert!(row.contains('-'));
    assert!(!row.contains("null"));
    assert!(!row.contains("undefined"));
}

#[test]
fn test_viewer_navigation_keeps_focus_visible() {
    let mut viewer = GridViewer::with_dimensions(keyed_table(100), 80, 10);

    viewer.end();
    assert_eq!(viewer.focused(), Some(99));
    let lines = viewer.render_lines();
    assert!(lines.iter().any(|l| l.starts_with("> ") && l.contains("Item 99")));

    viewer.home();
    assert_eq!(viewer.focused(), Some(0));
    assert_eq!(viewer.scroll_offset(), 0);
}

#[test]
fn test_viewer_search_functionality() {
    let mut viewer = GridViewer::with_dimensions(keyed_table(20), 80, 30);

    viewer.set_query("item 1");
    // Item 1, Item 10..Item 19
    assert_eq!(viewer.row_count(), 11);
    assert_eq!(viewer.footer(), "Showing 11 rows");
    assert_eq!(viewer.search_summary(), "Showing 11 of 20 rows");

    viewer.set_query("   ");
    assert_eq!(viewer.row_count(), 20);
}

#[test]
fn test_viewer_no_matches_message() {
    let mut viewer = GridViewer::with_dimensions(keyed_table(5), 80, 10);
    viewer.set_query("zzz");

    let lines = viewer.render_lines();
    assert!(lines.iter().any(|l| l.contains("No matching rows.")));
    assert_eq!(lines.last().map(String::as_str), Some("Showing 0 rows"));
    assert_eq!(viewer.focused(), None);
}

#[test]
fn test_viewer_long_name_wraps() {
    let payload = RawPayload::from_json_str(
        r#"[{"ID":"1","Name":"a very long product name that will not fit in one narrow column at all"}]"#,
    )
    .unwrap();
    let viewer = GridViewer::with_dimensions(normalize(&payload, true), 40, 20);

    assert!(viewer.row_height(0) > 1);
    assert_eq!(viewer.row_lines(0).len(), viewer.row_height(0));
}

// ============================================================================
// DetailView Snapshot Tests
// ============================================================================

#[test]
fn test_detail_view_render_after_activation() {
    let viewer = GridViewer::with_dimensions(annotated_table(), 60, 10);
    let mut store = SessionStore::new();
    let route = viewer.activate_index(&mut store, 0).unwrap();
    assert_eq!(route, Route::Detail { index: 0 });

    let detail = DetailView::load_with_dimensions(&store, 0, 60, 20);
    let lines = detail.render_lines();

    assert_eq!(lines[0], "Selected Row");
    assert!(lines.iter().any(|l| l == "Top Row"));
    assert!(lines.iter().any(|l| l.contains("TopA") && l.contains("TopB")));
    assert!(lines.iter().any(|l| l.starts_with("Column") && l.ends_with("Value")));
    assert!(lines.iter().any(|l| l.starts_with("Name") && l.ends_with("Widget")));
}

#[test]
fn test_detail_view_blank_value_placeholder() {
    let viewer = GridViewer::with_dimensions(annotated_table(), 60, 10);
    let mut store = SessionStore::new();
    viewer.activate_index(&mut store, 1).unwrap();

    let detail = DetailView::load_with_dimensions(&store, 1, 60, 20);
    let view = detail.loaded().unwrap();
    assert_eq!(view.field_value("Name"), Some("-"));
}

#[test]
fn test_detail_view_without_selection() {
    let store = SessionStore::new();
    let detail = DetailView::load(&store, 3);

    assert!(!detail.is_loaded());
    let lines = detail.render_lines();
    assert_eq!(lines[0], NO_ROW_SELECTED);
    assert!(lines.iter().any(|l| l.contains("Go back")));
}

#[test]
fn test_detail_view_with_corrupt_snapshot() {
    let mut store = SessionStore::new();
    store
        .set_item(sheetgrid::selection::SELECTED_ROW_KEY, "{not json".to_string())
        .unwrap();

    assert!(!DetailView::load(&store, 0).is_loaded());
}

// ============================================================================
// App Snapshot Tests
// ============================================================================

#[test]
fn test_app_loading_then_ready() {
    let mut app = App::with_dimensions(SessionStore::new(), "sheet.csv", 60, 12);
    assert!(app.render_lines().iter().any(|l| l.contains("Loading")));

    let payload = RawPayload::from_json_str(r#"[{"ID":"1","Name":"Widget"}]"#);
    app.finish_loading(payload, true, "");
    assert!(matches!(app.load_state(), LoadState::Ready(_)));

    let lines = app.render_lines();
    assert!(lines[0].contains("sheetgrid"));
    assert!(lines.iter().any(|l| l.contains("Widget")));
}

#[test]
fn test_app_failed_load_shows_error() {
    let mut app = App::with_dimensions(SessionStore::new(), "sheet.csv", 60, 12);
    app.finish_loading(Err(sheetgrid::Error::parse("bad sheet")), true, "");

    assert!(app.render_lines().iter().any(|l| l.starts_with("Error:")));
}

#[test]
fn test_app_empty_source_shows_no_data() {
    let mut app = App::with_dimensions(SessionStore::new(), "sheet.csv", 60, 12);
    app.finish_loading(Ok(RawPayload::keyed(Vec::new())), true, "");

    assert!(matches!(app.load_state(), LoadState::Empty));
    assert!(app.render_lines().iter().any(|l| l == "No data found."));
}

#[test]
fn test_app_enter_opens_detail_and_escape_returns() {
    let mut app = App::with_dimensions(SessionStore::new(), "sheet.csv", 60, 20);
    app.finish_loading(Ok(RawPayload::from_json_str(
        r#"[{"ID":"1","Name":"Widget"},{"ID":"2","Name":"Gadget"}]"#,
    )
    .unwrap()), true, "");

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.route(), Route::Detail { index: 1 });
    assert!(app.render_lines().iter().any(|l| l.contains("Gadget")));

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.route(), Route::Grid);
    assert_eq!(app.viewer().and_then(GridViewer::focused), Some(1));
}

#[test]
fn test_app_search_mode_filters() {
    let mut app = App::with_dimensions(SessionStore::new(), "sheet.csv", 60, 20);
    app.finish_loading(Ok(RawPayload::from_json_str(
        r#"[{"ID":"1","Name":"Widget"},{"ID":"2","Name":"Gadget"}]"#,
    )
    .unwrap()), true, "");

    app.handle_key(key(KeyCode::Char('/')));
    for c in "gad".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter));

    let viewer = app.viewer().unwrap();
    assert_eq!(viewer.query(), "gad");
    assert_eq!(viewer.row_count(), 1);
}

// ============================================================================
// ScrollState Tests
// ============================================================================

#[test]
fn test_scroll_state_navigation() {
    let mut scroll = ScrollState::new(100, 20);

    scroll.page_down();
    assert_eq!(scroll.focus(), Some(20));
    assert_eq!(scroll.offset(), 1);

    scroll.end();
    assert_eq!(scroll.offset(), 80);
    assert!(scroll.needs_scrollbar());
}
