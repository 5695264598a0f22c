//! Raw payload model
//!
//! A fetched sheet arrives either as a sequence of keyed records (the CSV
//! header row was consumed) or as a sequence of raw row-sequences (a grid of
//! unlabeled rows). [`RawPayload`] fixes that interpretation once, by looking
//! at the first element only.
//!
//! Decoding is tolerant: nested arrays or objects inside a cell become
//! [`Scalar::Null`], and elements of the "other" shape are kept as-is so the
//! normalizer can degrade them to absent values instead of failing.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};

/// A primitive cell value, or an absent one.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    /// Absent value (JSON `null`, empty CSV field, missing column)
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Scalar {
    /// Create a text scalar
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether this value is absent
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the string form is empty after trimming
    ///
    /// Absent values are always blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => false,
        }
    }
}

/// Absent-safe string form: `Null` writes nothing.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a primitive cell value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Scalar, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Scalar, E> {
        Ok(i64::try_from(v).map_or(Scalar::Float(v as f64), Scalar::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    // Nested structures are not cells; they degrade to absent.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Scalar, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Scalar::Null)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Scalar, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Scalar::Null)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_any(ScalarVisitor)
    }
}

/// A keyed row: header name to value, in first-seen key order.
///
/// Keys are not required to be unique on construction through [`Record::push`];
/// lookups return the first match. Decoding from JSON keeps the last value for
/// a repeated key at the position where the key was first seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field without checking for an existing key
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Insert a field, replacing the value of an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Values in key order
    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.fields.iter().map(|(_, v)| v)
    }

    /// Iterate over `(key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn read_record<'de, A: MapAccess<'de>>(mut map: A) -> std::result::Result<Record, A::Error> {
    let mut record = Record::new();
    while let Some((key, value)) = map.next_entry::<String, Scalar>()? {
        record.insert(key, value);
    }
    Ok(record)
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a keyed record")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Record, A::Error> {
        read_record(map)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_map(RecordVisitor)
    }
}

/// One element of a raw payload, as delivered by the source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawElement {
    /// An ordered sequence of cells
    Row(Vec<Scalar>),
    /// A keyed record
    Record(Record),
    /// A bare value where a row was expected
    Cell(Scalar),
}

impl RawElement {
    /// Whether this element is itself a sequence
    #[inline]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Row(_))
    }

    /// The cells of a sequence element
    pub fn as_row(&self) -> Option<&[Scalar]> {
        match self {
            Self::Row(cells) => Some(cells.as_slice()),
            _ => None,
        }
    }

    /// The fields of a record element
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl Serialize for RawElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Row(cells) => cells.serialize(serializer),
            Self::Record(record) => record.serialize(serializer),
            Self::Cell(cell) => cell.serialize(serializer),
        }
    }
}

struct ElementVisitor;

impl<'de> Visitor<'de> for ElementVisitor {
    type Value = RawElement;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a row, a record, or a value")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<RawElement, A::Error> {
        let mut cells = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(cell) = seq.next_element::<Scalar>()? {
            cells.push(cell);
        }
        Ok(RawElement::Row(cells))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<RawElement, A::Error> {
        read_record(map).map(RawElement::Record)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<RawElement, E> {
        Ok(RawElement::Cell(Scalar::Null))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<RawElement, E> {
        Ok(RawElement::Cell(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<RawElement, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<RawElement, E> {
        Ok(RawElement::Cell(Scalar::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<RawElement, E> {
        Ok(RawElement::Cell(Scalar::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RawElement, E> {
        ScalarVisitor.visit_u64(v).map(RawElement::Cell)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<RawElement, E> {
        Ok(RawElement::Cell(Scalar::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RawElement, E> {
        Ok(RawElement::Cell(Scalar::text(v)))
    }
}

impl<'de> Deserialize<'de> for RawElement {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_any(ElementVisitor)
    }
}

/// A fetched payload with its interpretation fixed.
///
/// The tag is decided once from the first element and never re-evaluated per
/// row. Downstream code pattern-matches on it instead of re-inspecting shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// First element is a sequence: a raw grid of positional rows
    Positional(Vec<RawElement>),
    /// First element is not a sequence: keyed records
    Keyed(Vec<RawElement>),
}

impl RawPayload {
    /// Fix the interpretation of a list of elements from its first element
    pub fn from_elements(elements: Vec<RawElement>) -> Self {
        if elements.first().is_some_and(RawElement::is_sequence) {
            Self::Positional(elements)
        } else {
            Self::Keyed(elements)
        }
    }

    /// Build a positional payload from rows of cells
    pub fn positional(rows: Vec<Vec<Scalar>>) -> Self {
        Self::Positional(rows.into_iter().map(RawElement::Row).collect())
    }

    /// Build a keyed payload from records
    pub fn keyed(records: Vec<Record>) -> Self {
        Self::Keyed(records.into_iter().map(RawElement::Record).collect())
    }

    /// Decode a JSON array of arrays or array of objects
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is not a JSON array.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let elements: Vec<RawElement> = serde_json::from_str(text)
            .map_err(|e| Error::parse(format!("Expected a JSON array of rows or records: {e}")))?;
        Ok(Self::from_elements(elements))
    }

    /// Decode a JSON payload from bytes
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes are not a JSON array.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let elements: Vec<RawElement> = serde_json::from_slice(bytes)
            .map_err(|e| Error::parse(format!("Expected a JSON array of rows or records: {e}")))?;
        Ok(Self::from_elements(elements))
    }

    /// All elements, regardless of interpretation
    pub fn elements(&self) -> &[RawElement] {
        match self {
            Self::Positional(elements) | Self::Keyed(elements) => elements,
        }
    }

    /// Number of raw elements (including any header or top row)
    #[inline]
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Whether the payload has no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    /// Whether the payload is a raw grid
    #[inline]
    pub fn is_positional(&self) -> bool {
        matches!(self, Self::Positional(_))
    }
}
