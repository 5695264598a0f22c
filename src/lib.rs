//! sheetgrid - searchable, row-selectable grid over a published spreadsheet
//!
//! Loads a sheet exported as CSV (or a JSON array of rows), settles its shape
//! into a canonical table, filters rows by a free-text query and renders them
//! as a grid. Choosing a row hands a snapshot of it to a detail view through a
//! session-scoped store.
//!
//! # Pipeline
//!
//! 1. **Fetch** - [`backend::SourceBackend`] reads bytes from HTTP, disk or
//!    memory
//! 2. **Parse** - [`parse::parse_csv`] or JSON into a [`RawPayload`]
//! 3. **Normalize** - [`normalize()`] picks headers, rows and the optional top
//!    row
//! 4. **Filter** - [`filter_rows`] keeps rows containing the query
//! 5. **Render** - [`grid::render`] and the [`tui`] views
//! 6. **Select** - [`select`] stores the row and returns the detail route
//!
//! # Quick Start
//!
//! ```
//! use sheetgrid::{filter_rows, normalize, RawPayload};
//!
//! let payload = RawPayload::from_json_str(
//!     r#"[["Totals","",""],["ID","Name","Price"],["1","Widget","9"],["2","Gadget","12"]]"#,
//! )
//! .unwrap();
//! let table = normalize(&payload, true);
//! assert_eq!(table.headers, vec!["ID", "Name", "Price"]);
//! assert_eq!(filter_rows(&table.rows, "GADGET").len(), 1);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_possible_truncation,
        clippy::redundant_clone,
        clippy::too_many_lines
    )
)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
/// CLI module for command-line interface
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod normalize;
pub mod parse;
pub mod payload;
pub mod route;
pub mod selection;
/// Terminal grid and detail views
pub mod tui;
pub mod url;

pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use filter::{filter_rows, matching_indices};
pub use grid::{DisplayModel, PLACEHOLDER};
pub use normalize::{normalize, CanonicalRow, CanonicalTable};
pub use payload::{RawElement, RawPayload, Record, Scalar};
pub use route::Route;
pub use selection::{select, SelectionSnapshot, SessionStore, SnapshotStore};
pub use tui::{DetailView, GridViewer, TuiError, TuiResult};
pub use url::build_csv_url;
