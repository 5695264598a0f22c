//! In-memory source backend.

use std::{collections::HashMap, sync::RwLock};

use bytes::Bytes;

use super::{Fetched, SourceBackend};
use crate::error::{Error, Result};

/// An in-memory source backend.
///
/// Holds canned responses keyed by location. Useful for tests and for
/// feeding already-downloaded exports through the normal load path.
///
/// # Example
///
/// ```
/// use sheetgrid::backend::{MemoryBackend, SourceBackend};
///
/// let backend = MemoryBackend::new();
/// backend.insert("sheet.csv", Some("text/csv"), "ID\n1\n");
/// let fetched = backend.fetch("sheet.csv").unwrap();
/// assert_eq!(fetched.content_type.as_deref(), Some("text/csv"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, Fetched>>,
}

impl MemoryBackend {
    /// Creates a new empty memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a response for `location`, replacing any previous one.
    pub fn insert(&self, location: &str, content_type: Option<&str>, body: impl Into<Bytes>) {
        if let Ok(mut data) = self.data.write() {
            data.insert(location.to_string(), Fetched::new(content_type, body));
        }
    }

    /// Returns the number of stored responses.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all stored responses.
    pub fn clear(&self) {
        if let Ok(mut data) = self.data.write() {
            data.clear();
        }
    }
}

impl SourceBackend for MemoryBackend {
    fn fetch(&self, location: &str) -> Result<Fetched> {
        let data = self
            .data
            .read()
            .map_err(|_| Error::source_unavailable(location, "Failed to acquire read lock"))?;

        data.get(location)
            .cloned()
            .ok_or_else(|| Error::source_unavailable(location, "Not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_memory_insert_fetch() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());
        backend.insert("a", None, "x");
        assert_eq!(backend.len(), 1);
        let fetched = backend.fetch("a").unwrap();
        assert_eq!(fetched.body, Bytes::from("x"));
        assert!(fetched.content_type.is_none());
    }

    #[test]
    fn f_memory_insert_replaces() {
        let backend = MemoryBackend::new();
        backend.insert("a", None, "x");
        backend.insert("a", Some("text/csv"), "y");
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.fetch("a").unwrap().body, Bytes::from("y"));
    }

    #[test]
    fn f_memory_missing_is_source_unavailable() {
        let backend = MemoryBackend::new();
        let err = backend.fetch("missing").unwrap_err();
        assert!(err.is_source_unavailable());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn f_memory_clear() {
        let backend = MemoryBackend::new();
        backend.insert("a", None, "x");
        backend.clear();
        assert!(backend.is_empty());
    }

    #[test]
    fn f_memory_is_shareable() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let writer = std::sync::Arc::clone(&backend);
        std::thread::spawn(move || writer.insert("t", None, "1"))
            .join()
            .unwrap();
        assert_eq!(backend.len(), 1);
    }
}
