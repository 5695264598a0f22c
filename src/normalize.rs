//! Shape normalizer
//!
//! Turns a [`RawPayload`] into the canonical `{headers, rows, top_row}` triple
//! shared by filtering, rendering and selection.
//!
//! For a raw grid the header row is either the first row, or, with the
//! second-row-as-header policy and at least two rows, the second row, the
//! first one being kept aside as a top row annotation.

use serde::{Deserialize, Serialize};

use crate::payload::{RawElement, RawPayload, Record, Scalar};

/// A data row in canonical form.
///
/// All rows of one table share the same variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalRow {
    /// Cells aligned by index to the headers
    Positional(Vec<Scalar>),
    /// Values looked up by header name
    Keyed(Record),
}

impl CanonicalRow {
    /// Value for the column at `col` named `header`
    ///
    /// Positional rows are read by index, keyed rows by name. A missing cell
    /// is `None`.
    pub fn value(&self, col: usize, header: &str) -> Option<&Scalar> {
        match self {
            Self::Positional(cells) => cells.get(col),
            Self::Keyed(record) => record.get(header),
        }
    }

    /// Every field of the row, including keys that are not headers
    pub fn fields(&self) -> Box<dyn Iterator<Item = &Scalar> + '_> {
        match self {
            Self::Positional(cells) => Box::new(cells.iter()),
            Self::Keyed(record) => Box::new(record.values()),
        }
    }

    /// Whether this row is positional
    #[inline]
    pub fn is_positional(&self) -> bool {
        matches!(self, Self::Positional(_))
    }
}

/// The canonical model derived once from a payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalTable {
    /// Column names, in display order
    pub headers: Vec<String>,
    /// Data rows, excluding header and top row
    pub rows: Vec<CanonicalRow>,
    /// Row displayed above the table, outside the row list
    pub top_row: Option<Vec<Scalar>>,
}

impl CanonicalTable {
    /// Number of data rows
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[inline]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Whether there are no data rows
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Normalize a raw payload into headers, rows and an optional top row.
///
/// Never fails. An empty payload yields an empty table, but callers are
/// expected to show a "no data" state before getting here.
///
/// # Example
///
/// ```
/// use sheetgrid::{normalize, RawPayload};
///
/// let payload = RawPayload::from_json_str(
///     r#"[["TopA","TopB"],["ID","Name"],["1","Widget"]]"#,
/// ).unwrap();
/// let table = normalize(&payload, true);
/// assert_eq!(table.headers, vec!["ID", "Name"]);
/// assert_eq!(table.row_count(), 1);
/// assert!(table.top_row.is_some());
/// ```
pub fn normalize(payload: &RawPayload, use_second_row_as_header: bool) -> CanonicalTable {
    let table = match payload {
        RawPayload::Positional(elements) => normalize_positional(elements, use_second_row_as_header),
        RawPayload::Keyed(elements) => normalize_keyed(elements),
    };
    tracing::debug!(
        positional = payload.is_positional(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        top_row = table.top_row.is_some(),
        "normalized payload"
    );
    table
}

fn normalize_positional(elements: &[RawElement], second_row_header: bool) -> CanonicalTable {
    let (top_row, header_element, data) = if second_row_header && elements.len() >= 2 {
        let top = elements[0].as_row().map(<[Scalar]>::to_vec);
        (top, elements.get(1), &elements[2..])
    } else {
        (None, elements.first(), elements.get(1..).unwrap_or(&[]))
    };

    let headers = header_element
        .and_then(RawElement::as_row)
        .map(|cells| cells.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    let rows = data
        .iter()
        .map(|element| match element {
            RawElement::Row(cells) => CanonicalRow::Positional(cells.clone()),
            other => {
                tracing::warn!(?other, "non-sequence element in a positional payload");
                CanonicalRow::Positional(Vec::new())
            }
        })
        .collect();

    CanonicalTable {
        headers,
        rows,
        top_row,
    }
}

fn normalize_keyed(elements: &[RawElement]) -> CanonicalTable {
    let headers = elements
        .first()
        .and_then(RawElement::as_record)
        .map(|record| record.keys().map(str::to_string).collect())
        .unwrap_or_default();

    let rows = elements
        .iter()
        .map(|element| match element {
            RawElement::Record(record) => CanonicalRow::Keyed(record.clone()),
            other => {
                tracing::warn!(?other, "non-record element in a keyed payload");
                CanonicalRow::Keyed(Record::new())
            }
        })
        .collect();

    CanonicalTable {
        headers,
        rows,
        top_row: None,
    }
}
