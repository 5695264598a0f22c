//! Free-text row filter
//!
//! Case-insensitive substring search over every field of every row. Results
//! are always derived from the full canonical row set, so widening a query
//! after narrowing it brings hidden rows back.

use crate::normalize::CanonicalRow;

/// Whether a query filters anything at all
///
/// Empty and whitespace-only queries are inactive.
#[inline]
pub fn is_active_query(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Whether any field of `row` contains `query_lower`
///
/// `query_lower` must already be lowercased. Absent fields match as `""`.
pub fn row_matches(row: &CanonicalRow, query_lower: &str) -> bool {
    row.fields()
        .any(|value| value.to_string().to_lowercase().contains(query_lower))
}

/// Indices of the rows matching `query`, in original order
///
/// An inactive query matches every row.
pub fn matching_indices(rows: &[CanonicalRow], query: &str) -> Vec<usize> {
    if !is_active_query(query) {
        return (0..rows.len()).collect();
    }
    let query_lower = query.to_lowercase();
    let indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, &query_lower))
        .map(|(i, _)| i)
        .collect();
    tracing::debug!(query, matched = indices.len(), total = rows.len(), "filtered rows");
    indices
}

/// Rows matching `query`, borrowed from the canonical set in original order
///
/// # Example
///
/// ```
/// use sheetgrid::{filter_rows, normalize, RawPayload};
///
/// let payload = RawPayload::from_json_str(
///     r#"[{"ID":"1","Name":"Widget"},{"ID":"2","Name":"Gadget"}]"#,
/// ).unwrap();
/// let table = normalize(&payload, true);
/// let hits = filter_rows(&table.rows, "gadget");
/// assert_eq!(hits.len(), 1);
/// ```
pub fn filter_rows<'a>(rows: &'a [CanonicalRow], query: &str) -> Vec<&'a CanonicalRow> {
    matching_indices(rows, query)
        .into_iter()
        .filter_map(|i| rows.get(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Record, Scalar};

    fn keyed(pairs: &[(&str, &str)]) -> CanonicalRow {
        CanonicalRow::Keyed(pairs.iter().copied().collect::<Record>())
    }

    fn sample_rows() -> Vec<CanonicalRow> {
        vec![
            keyed(&[("ID", "1"), ("Name", "Widget")]),
            keyed(&[("ID", "2"), ("Name", "Gadget")]),
            keyed(&[("ID", "3"), ("Name", "Gizmo")]),
        ]
    }

    #[test]
    fn f_filter_case_insensitive() {
        let rows = sample_rows();
        let hits = filter_rows(&rows, "gadget");
        assert_eq!(hits, vec![&rows[1]]);
        let hits = filter_rows(&rows, "GADGET");
        assert_eq!(hits, vec![&rows[1]]);
    }

    #[test]
    fn f_filter_empty_query_returns_all() {
        let rows = sample_rows();
        assert_eq!(filter_rows(&rows, "").len(), 3);
        assert_eq!(filter_rows(&rows, "   ").len(), 3);
        assert_eq!(matching_indices(&rows, "\t"), vec![0, 1, 2]);
    }

    #[test]
    fn f_filter_preserves_order() {
        let rows = sample_rows();
        assert_eq!(matching_indices(&rows, "g"), vec![0, 1, 2]);
        assert_eq!(matching_indices(&rows, "gi"), vec![2]);
    }

    #[test]
    fn f_filter_preserves_identity() {
        let rows = sample_rows();
        let hits = filter_rows(&rows, "2");
        assert!(std::ptr::eq(hits[0], &rows[1]), "FALSIFIED: filter must borrow canonical rows");
    }

    #[test]
    fn f_filter_any_field_matches() {
        let rows = sample_rows();
        assert_eq!(matching_indices(&rows, "3"), vec![2]);
    }

    #[test]
    fn f_filter_null_never_matches_non_empty_query() {
        let rows = vec![CanonicalRow::Positional(vec![Scalar::Null, Scalar::Null])];
        assert!(matching_indices(&rows, "null").is_empty());
        assert!(matching_indices(&rows, "undefined").is_empty());
    }

    #[test]
    fn f_filter_matches_hidden_keys() {
        let rows = vec![keyed(&[("ID", "1"), ("Notes", "secret")])];
        assert_eq!(matching_indices(&rows, "secret"), vec![0]);
    }

    #[test]
    fn f_filter_positional_numbers() {
        let rows = vec![
            CanonicalRow::Positional(vec![Scalar::Int(100), Scalar::Float(2.5)]),
            CanonicalRow::Positional(vec![Scalar::Bool(true)]),
        ];
        assert_eq!(matching_indices(&rows, "2.5"), vec![0]);
        assert_eq!(matching_indices(&rows, "TRUE"), vec![1]);
    }

    #[test]
    fn f_filter_query_with_inner_space() {
        let rows = vec![keyed(&[("Name", "Blue Widget")]), keyed(&[("Name", "Bluewidget")])];
        assert_eq!(matching_indices(&rows, "blue w"), vec![0]);
    }

    #[test]
    fn f_filter_no_match() {
        let rows = sample_rows();
        assert!(filter_rows(&rows, "nonexistent_xyz").is_empty());
    }
}
