//! Local filesystem source backend.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bytes::Bytes;

use super::{Fetched, SourceBackend};
use crate::error::{Error, Result};

/// A source backend reading exported sheets from disk.
///
/// Relative locations resolve against the root directory when one is set,
/// otherwise against the working directory.
///
/// # Example
///
/// ```no_run
/// use sheetgrid::backend::{LocalBackend, SourceBackend};
///
/// let backend = LocalBackend::with_root("/data/sheets").unwrap();
/// let fetched = backend.fetch("inventory.csv").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    root: Option<PathBuf>,
}

impl LocalBackend {
    /// Creates a backend resolving paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend resolving relative paths against `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or is not a directory.
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let metadata = fs::metadata(&root).map_err(|e| Error::io(e, &root))?;
        if !metadata.is_dir() {
            return Err(Error::invalid_config(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root: Some(root) })
    }

    /// Returns the root directory, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve_path(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Content type implied by a file extension
fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        "html" | "htm" => Some("text/html"),
        _ => None,
    }
}

impl SourceBackend for LocalBackend {
    fn fetch(&self, location: &str) -> Result<Fetched> {
        let path = self.resolve_path(location);
        let data = fs::read(&path).map_err(|e| {
            Error::source_unavailable(path.display().to_string(), format!("Failed to read file: {e}"))
        })?;
        tracing::info!(path = %path.display(), bytes = data.len(), "read sheet file");
        Ok(Fetched {
            content_type: content_type_for(&path).map(str::to_string),
            body: Bytes::from(data),
        })
    }
}
