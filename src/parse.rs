//! CSV parsing into raw payloads
//!
//! CSV text goes through `arrow-csv` with every column read as nullable text,
//! then each record batch row becomes a payload element. With a header row
//! (the default) the result is keyed; without one, every line is a positional
//! row and the normalizer picks the header row.
//!
//! Records may differ in length. A flexible `csv` pre-scan finds the widest
//! one, and every row is read at that width with missing fields absent.

use std::io::Cursor;
use std::sync::Arc;

use arrow::array::{Array, LargeStringArray, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow_csv::{reader::Format, ReaderBuilder};

use crate::error::{Error, Result};
use crate::payload::{RawElement, RawPayload, Record, Scalar};

/// Options for CSV parsing.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the first line names the columns.
    pub has_header: bool,
    /// Delimiter character (default is comma).
    pub delimiter: Option<u8>,
    /// Batch size for reading.
    pub batch_size: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: None,
            batch_size: 1024,
        }
    }
}

impl CsvOptions {
    /// Creates new CSV options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the text has a header row.
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Sets the delimiter character.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets the batch size for reading.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Parse CSV text into a raw payload.
///
/// Empty lines are skipped and empty fields are absent. Rows are padded to the
/// widest record with absent values. In keyed mode fields past the header have
/// no name and are dropped.
///
/// # Errors
///
/// Returns a parse error when the text cannot be read as CSV at all.
///
/// # Example
///
/// ```
/// use sheetgrid::parse::{parse_csv, CsvOptions};
///
/// let payload = parse_csv("ID,Name\n1,Widget\n", &CsvOptions::default()).unwrap();
/// assert!(!payload.is_positional());
/// assert_eq!(payload.len(), 1);
/// ```
pub fn parse_csv(text: &str, options: &CsvOptions) -> Result<RawPayload> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Ok(empty_payload(options));
    }

    // The first line names the columns; the widest record sets their count.
    let mut format = Format::default().with_header(options.has_header);
    if let Some(delim) = options.delimiter {
        format = format.with_delimiter(delim);
    }
    let (inferred, _) = format
        .infer_schema(Cursor::new(text.as_bytes()), Some(0))
        .map_err(|e| Error::parse(format!("Failed to read CSV header: {e}")))?;
    let named = inferred.fields().len();
    let width = widest_record(text, options)?.max(named);

    let fields: Vec<Field> = (0..width)
        .map(|i| match inferred.fields().get(i) {
            Some(f) => Field::new(f.name(), DataType::Utf8, true),
            None => Field::new(format!("column_{}", i + 1), DataType::Utf8, true),
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut builder = ReaderBuilder::new(schema.clone())
        .with_header(options.has_header)
        .with_batch_size(options.batch_size)
        .with_truncated_rows(true);
    if let Some(delim) = options.delimiter {
        builder = builder.with_delimiter(delim);
    }

    let reader = builder
        .build(Cursor::new(text.as_bytes()))
        .map_err(|e| Error::parse(format!("Failed to parse CSV: {e}")))?;
    let batches: Vec<RecordBatch> = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::parse(format!("Failed to read CSV batch: {e}")))?;

    let elements = if options.has_header {
        let names: Vec<&str> = schema
            .fields()
            .iter()
            .take(named)
            .map(|f| f.name().as_str())
            .collect();
        keyed_elements(&batches, &names)
    } else {
        positional_elements(&batches)
    };

    tracing::info!(
        rows = elements.len(),
        columns = width,
        keyed = options.has_header,
        "parsed CSV"
    );

    Ok(if options.has_header {
        RawPayload::Keyed(elements)
    } else {
        RawPayload::Positional(elements)
    })
}

/// Parse CSV bytes, replacing invalid UTF-8 sequences.
///
/// # Errors
///
/// See [`parse_csv`].
pub fn parse_csv_bytes(bytes: &[u8], options: &CsvOptions) -> Result<RawPayload> {
    parse_csv(&String::from_utf8_lossy(bytes), options)
}

/// Field count of the longest record, header line included
fn widest_record(text: &str, options: &CsvOptions) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter.unwrap_or(b','))
        .from_reader(text.as_bytes());

    let mut record = csv::ByteRecord::new();
    let mut widest = 0;
    while reader
        .read_byte_record(&mut record)
        .map_err(|e| Error::parse(format!("Failed to scan CSV: {e}")))?
    {
        widest = widest.max(record.len());
    }
    Ok(widest)
}

fn empty_payload(options: &CsvOptions) -> RawPayload {
    if options.has_header {
        RawPayload::Keyed(Vec::new())
    } else {
        RawPayload::Positional(Vec::new())
    }
}

fn keyed_elements(batches: &[RecordBatch], names: &[&str]) -> Vec<RawElement> {
    let mut elements = Vec::new();
    for batch in batches {
        for row in 0..batch.num_rows() {
            let mut record = Record::new();
            for (col, name) in names.iter().enumerate() {
                record.push(*name, cell_at(batch, col, row));
            }
            elements.push(RawElement::Record(record));
        }
    }
    elements
}

fn positional_elements(batches: &[RecordBatch]) -> Vec<RawElement> {
    let mut elements = Vec::new();
    for batch in batches {
        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| cell_at(batch, col, row))
                .collect();
            elements.push(RawElement::Row(cells));
        }
    }
    elements
}

/// Read one cell of a text batch; anything unreadable is absent
fn cell_at(batch: &RecordBatch, col: usize, row: usize) -> Scalar {
    let Some(array) = batch.columns().get(col) else {
        return Scalar::Null;
    };
    if row >= array.len() || array.is_null(row) {
        return Scalar::Null;
    }
    let any = array.as_any();
    if let Some(arr) = any.downcast_ref::<StringArray>() {
        Scalar::text(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        Scalar::text(arr.value(row))
    } else {
        Scalar::Null
    }
}
