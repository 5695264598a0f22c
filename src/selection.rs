//! Selection hand-off
//!
//! Activating a row captures `{headers, row, topRow}` into a transient,
//! single-slot store and navigates to the detail route. The detail view reads
//! the slot back and needs nothing else: no refetch, no renormalization.
//!
//! Writes are best effort. A full or disabled store never blocks navigation;
//! the detail view then shows its "no row selected" state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::CanonicalRow;
use crate::payload::Scalar;
use crate::route::Route;

/// Fixed key of the selection slot
pub const SELECTED_ROW_KEY: &str = "selectedRow";

/// Self-sufficient description of one selected row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// Headers of the table the row came from
    pub headers: Vec<String>,
    /// The row, untouched
    pub row: CanonicalRow,
    /// Top row of the table, if it had one
    #[serde(rename = "topRow", default)]
    pub top_row: Option<Vec<Scalar>>,
}

impl SelectionSnapshot {
    /// Capture a snapshot
    pub fn new(headers: &[String], row: &CanonicalRow, top_row: Option<&[Scalar]>) -> Self {
        Self {
            headers: headers.to_vec(),
            row: row.clone(),
            top_row: top_row.map(<[Scalar]>::to_vec),
        }
    }

    /// Encode as the JSON text kept in the store
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from stored JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a snapshot.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A per-session key/value store for transient hand-off state.
///
/// Modeled on browser session storage: string values, fallible writes,
/// last write wins.
pub trait SnapshotStore {
    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] when the store is full or disabled.
    fn set_item(&mut self, key: &str, value: String) -> Result<()>;

    /// Read the value under `key`
    fn get_item(&self, key: &str) -> Option<String>;

    /// Remove the value under `key`
    fn remove_item(&mut self, key: &str);
}

/// In-memory session store with an optional byte quota
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl SessionStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes beyond `quota_bytes` in total
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SnapshotStore for SessionStore {
    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(Error::storage(format!(
                    "quota exceeded: {needed} bytes needed, {quota} allowed"
                )));
            }
        }
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// A store whose writes always fail and which never holds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl SnapshotStore for DisabledStore {
    fn set_item(&mut self, _key: &str, _value: String) -> Result<()> {
        Err(Error::storage("session storage is disabled"))
    }

    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn remove_item(&mut self, _key: &str) {}
}

/// Write a snapshot into the selection slot, ignoring failures
pub fn store_snapshot<S: SnapshotStore + ?Sized>(store: &mut S, snapshot: &SelectionSnapshot) {
    let written = snapshot
        .to_json()
        .and_then(|json| store.set_item(SELECTED_ROW_KEY, json));
    if let Err(e) = written {
        tracing::debug!(error = %e, "selection snapshot not stored");
    }
}

/// Read the selection slot; `None` when absent or unreadable
pub fn load_snapshot<S: SnapshotStore + ?Sized>(store: &S) -> Option<SelectionSnapshot> {
    let raw = store.get_item(SELECTED_ROW_KEY)?;
    match SelectionSnapshot::from_json(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::debug!(error = %e, "stored selection snapshot is unreadable");
            None
        }
    }
}

/// Hand off an activated row to the detail view.
///
/// Stores the snapshot (best effort) and returns the route to navigate to.
pub fn select<S: SnapshotStore + ?Sized>(
    store: &mut S,
    index: usize,
    row: &CanonicalRow,
    headers: &[String],
    top_row: Option<&[Scalar]>,
) -> Route {
    store_snapshot(store, &SelectionSnapshot::new(headers, row, top_row));
    tracing::debug!(index, "row selected");
    Route::Detail { index }
}
