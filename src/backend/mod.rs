//! Source backends for sheetgrid.
//!
//! A backend fetches the raw bytes of a sheet export. The [`SourceBackend`]
//! trait defines the interface, with implementations for HTTP(S), the local
//! filesystem and in-memory fixtures. [`load_payload`] ties a backend to the
//! parsers: it rewrites sharing links, rejects HTML, and decodes CSV or JSON
//! into a [`RawPayload`].

#[cfg(feature = "http")]
pub mod http;
pub mod local;
pub mod memory;

use bytes::Bytes;
#[cfg(feature = "http")]
pub use http::HttpBackend;
pub use local::LocalBackend;
pub use memory::MemoryBackend;

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::parse::{parse_csv_bytes, CsvOptions};
use crate::payload::RawPayload;
use crate::url::build_csv_url;

/// Message shown when a source returns a web page instead of CSV
pub const HTML_REJECTION: &str =
    "Expected CSV but fetched HTML. Make sure the sheet is published or use a CSV export link.";

/// A fetched response body and its declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// `Content-Type` of the response, if any
    pub content_type: Option<String>,
    /// Raw body
    pub body: Bytes,
}

impl Fetched {
    /// Creates a fetched body.
    pub fn new(content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }
}

/// A source of sheet exports.
///
/// Backends are read-only and fetch a whole document per call. The sheet is
/// fetched once per session.
pub trait SourceBackend: Send + Sync {
    /// Fetches the document at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] if the document cannot be fetched.
    fn fetch(&self, location: &str) -> Result<Fetched>;
}

/// Encoding of a fetched document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated text
    Csv,
    /// A JSON array of rows or records
    Json,
}

impl SourceFormat {
    /// Format of a document from its location and content type; CSV unless
    /// either says JSON.
    pub fn detect(location: &str, content_type: Option<&str>) -> Self {
        let json_type = content_type.is_some_and(|ct| ct.contains("application/json"));
        let json_path = location
            .split(['?', '#'])
            .next()
            .is_some_and(|path| path.to_ascii_lowercase().ends_with(".json"));
        if json_type || json_path {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

/// Whether a response is a web page rather than data
pub fn is_html(fetched: &Fetched) -> bool {
    if fetched
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"))
    {
        return true;
    }
    let body = String::from_utf8_lossy(&fetched.body);
    body.trim_start().starts_with("<!DOCTYPE") || body.contains("<html")
}

/// Reject HTML responses.
///
/// # Errors
///
/// Returns [`Error::SourceUnavailable`] with [`HTML_REJECTION`] when the
/// response is a web page.
pub fn ensure_not_html(location: &str, fetched: &Fetched) -> Result<()> {
    if is_html(fetched) {
        tracing::warn!(location, "source returned HTML");
        return Err(Error::source_unavailable(location, HTML_REJECTION));
    }
    Ok(())
}

/// Location actually fetched for a configured source: remote sharing links
/// are rewritten to their CSV export form, local paths are used as-is.
pub fn resolve_location(config: &ViewerConfig) -> String {
    if config.is_remote() {
        build_csv_url(&config.source)
    } else {
        config.source.clone()
    }
}

/// Fetch and decode the configured source.
///
/// # Errors
///
/// Returns [`Error::SourceUnavailable`] for fetch failures and HTML
/// responses, and a parse error for undecodable bodies.
pub fn load_payload(backend: &dyn SourceBackend, config: &ViewerConfig) -> Result<RawPayload> {
    let location = resolve_location(config);
    tracing::info!(%location, "fetching sheet");

    let fetched = backend.fetch(&location)?;
    ensure_not_html(&location, &fetched)?;

    let payload = match SourceFormat::detect(&location, fetched.content_type.as_deref()) {
        SourceFormat::Json => RawPayload::from_json_slice(&fetched.body)?,
        SourceFormat::Csv => {
            let options = CsvOptions::new().with_header(!config.raw);
            parse_csv_bytes(&fetched.body, &options)?
        }
    };

    tracing::info!(
        elements = payload.len(),
        positional = payload.is_positional(),
        "sheet loaded"
    );
    Ok(payload)
}

/// Creates the backend suited to a configured source.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created, or if the source is
/// remote and the `http` feature is disabled.
pub fn create_backend(config: &ViewerConfig) -> Result<Box<dyn SourceBackend>> {
    if config.is_remote() {
        #[cfg(feature = "http")]
        {
            Ok(Box::new(HttpBackend::with_timeout(config.http_timeout_secs)?))
        }
        #[cfg(not(feature = "http"))]
        {
            Err(Error::invalid_config(
                "Remote sources require the 'http' feature",
            ))
        }
    } else {
        Ok(Box::new(LocalBackend::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with(location: &str, content_type: Option<&str>, body: &str) -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.insert(location, content_type, body.to_string());
        backend
    }

    #[test]
    fn f_detect_format() {
        assert_eq!(SourceFormat::detect("a.csv", None), SourceFormat::Csv);
        assert_eq!(SourceFormat::detect("a.JSON", None), SourceFormat::Json);
        assert_eq!(SourceFormat::detect("https://x/a.json?x=1", None), SourceFormat::Json);
        assert_eq!(
            SourceFormat::detect("https://x/data", Some("application/json; charset=utf-8")),
            SourceFormat::Json
        );
        assert_eq!(SourceFormat::detect("https://x/export?format=csv", Some("text/csv")), SourceFormat::Csv);
    }

    #[test]
    fn f_html_by_content_type() {
        let fetched = Fetched::new(Some("text/html; charset=utf-8"), "ID\n1\n");
        assert!(is_html(&fetched));
    }

    #[test]
    fn f_html_by_doctype() {
        let fetched = Fetched::new(Some("text/csv"), "  \n<!DOCTYPE html><p>login</p>");
        assert!(is_html(&fetched));
    }

    #[test]
    fn f_html_by_tag() {
        let fetched = Fetched::new(None, "<head></head><html lang=\"en\">");
        assert!(is_html(&fetched));
    }

    #[test]
    fn f_csv_is_not_html() {
        let fetched = Fetched::new(Some("text/csv"), "ID,Notes\n1,uses <b> tags\n");
        assert!(!is_html(&fetched));
    }

    #[test]
    fn f_ensure_not_html_message() {
        let fetched = Fetched::new(Some("text/html"), "<html></html>");
        let err = ensure_not_html("https://x", &fetched).unwrap_err();
        assert!(err.is_source_unavailable());
        assert!(err.to_string().contains(HTML_REJECTION));
    }

    #[test]
    fn f_resolve_location_rewrites_remote_only() {
        let remote = ViewerConfig::default().with_source("https://docs.google.com/spreadsheets/d/abc/edit");
        assert_eq!(
            resolve_location(&remote),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0"
        );
        let local = ViewerConfig::default().with_source("/tmp/spreadsheets/d/abc/edit");
        assert_eq!(resolve_location(&local), "/tmp/spreadsheets/d/abc/edit");
    }

    #[test]
    fn f_load_keyed_csv() {
        let backend = memory_with("sheet.csv", Some("text/csv"), "ID,Name\n1,Widget\n");
        let config = ViewerConfig::default().with_source("sheet.csv");
        let payload = load_payload(&backend, &config).unwrap();
        assert!(!payload.is_positional());
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn f_load_raw_csv_is_positional() {
        let backend = memory_with("sheet.csv", None, "Top,\nID,Name\n1,Widget\n");
        let config = ViewerConfig::default().with_source("sheet.csv").with_raw(true);
        let payload = load_payload(&backend, &config).unwrap();
        assert!(payload.is_positional());
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn f_load_json_payload() {
        let backend = memory_with("sheet.json", None, r#"[["ID"],["1"]]"#);
        let config = ViewerConfig::default().with_source("sheet.json");
        let payload = load_payload(&backend, &config).unwrap();
        assert!(payload.is_positional());
    }

    #[test]
    fn f_load_rewritten_remote_location() {
        let backend = memory_with(
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=7",
            Some("text/csv"),
            "ID\n1\n",
        );
        let config = ViewerConfig::default()
            .with_source("https://docs.google.com/spreadsheets/d/abc/edit?gid=7");
        assert_eq!(load_payload(&backend, &config).unwrap().len(), 1);
    }

    #[test]
    fn f_load_html_rejected() {
        let backend = memory_with("sheet.csv", Some("text/html"), "<!DOCTYPE html>");
        let config = ViewerConfig::default().with_source("sheet.csv");
        let err = load_payload(&backend, &config).unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn f_load_missing_source() {
        let backend = MemoryBackend::new();
        let config = ViewerConfig::default().with_source("nowhere.csv");
        assert!(load_payload(&backend, &config).unwrap_err().is_source_unavailable());
    }

    #[test]
    fn f_create_local_backend() {
        let config = ViewerConfig::default().with_source("sheet.csv");
        assert!(create_backend(&config).is_ok());
    }

    #[cfg(feature = "http")]
    #[test]
    fn f_create_http_backend() {
        assert!(create_backend(&ViewerConfig::default()).is_ok());
    }
}
