//! Viewer configuration
//!
//! The source comes from `SHEET_CSV_URL` when set, otherwise a fixed
//! published sheet. Command-line arguments overlay these values.

use serde::{Deserialize, Serialize};

/// Environment variable naming the source sheet
pub const SHEET_URL_ENV: &str = "SHEET_CSV_URL";

/// Sheet used when nothing else is configured
pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1gY_QQ16DNmcNX2C-js33_LYSpdUoXAq8qmmg1hmc8qg/edit?gid=0#gid=0";

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration of one viewer session.
///
/// # Example
///
/// ```
/// use sheetgrid::config::ViewerConfig;
///
/// let config = ViewerConfig::default()
///     .with_source("inventory.csv")
///     .with_second_row_as_header(false)
///     .with_initial_query("widget");
/// assert_eq!(config.source, "inventory.csv");
/// assert!(!config.second_row_as_header);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// URL or local path of the sheet
    pub source: String,
    /// Treat row 0 of a positional payload as the top row and row 1 as headers
    pub second_row_as_header: bool,
    /// Parse CSV without a header line, producing positional rows
    pub raw: bool,
    /// Query applied when the grid first opens
    pub initial_query: String,
    /// HTTP request timeout
    pub http_timeout_secs: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SHEET_URL.to_string(),
            second_row_as_header: true,
            raw: false,
            initial_query: String::new(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ViewerConfig {
    /// Defaults with the source taken from `SHEET_CSV_URL` if set and non-empty
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(SHEET_URL_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Self {
        let config = Self::default();
        match value {
            Some(source) if !source.trim().is_empty() => config.with_source(source.trim()),
            _ => config,
        }
    }

    /// Sets the source URL or path.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the header-row policy for positional payloads.
    #[must_use]
    pub fn with_second_row_as_header(mut self, enabled: bool) -> Self {
        self.second_row_as_header = enabled;
        self
    }

    /// Sets raw (header-less) CSV parsing.
    #[must_use]
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Sets the initial search query.
    #[must_use]
    pub fn with_initial_query(mut self, query: impl Into<String>) -> Self {
        self.initial_query = query.into();
        self
    }

    /// Sets the HTTP timeout.
    #[must_use]
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    /// Whether the source is fetched over HTTP
    pub fn is_remote(&self) -> bool {
        is_remote(&self.source)
    }
}

/// Whether a source string is an HTTP(S) URL
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_config_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.source, DEFAULT_SHEET_URL);
        assert!(config.second_row_as_header, "FALSIFIED: policy defaults on");
        assert!(!config.raw);
        assert!(config.initial_query.is_empty());
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert!(config.is_remote());
    }

    #[test]
    fn f_config_env_override() {
        let config = ViewerConfig::from_env_value(Some(" https://example.com/a.csv ".into()));
        assert_eq!(config.source, "https://example.com/a.csv");
    }

    #[test]
    fn f_config_env_blank_ignored() {
        assert_eq!(
            ViewerConfig::from_env_value(Some("   ".into())).source,
            DEFAULT_SHEET_URL
        );
        assert_eq!(ViewerConfig::from_env_value(None).source, DEFAULT_SHEET_URL);
    }

    #[test]
    fn f_config_builders() {
        let config = ViewerConfig::default()
            .with_source("data/sheet.json")
            .with_raw(true)
            .with_second_row_as_header(false)
            .with_initial_query("gadget")
            .with_http_timeout_secs(5);
        assert!(!config.is_remote());
        assert!(config.raw);
        assert!(!config.second_row_as_header);
        assert_eq!(config.initial_query, "gadget");
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn f_config_serde_partial() {
        let config: ViewerConfig = serde_json::from_str(r#"{"raw": true}"#).unwrap();
        assert!(config.raw);
        assert!(config.second_row_as_header);
        assert_eq!(config.source, DEFAULT_SHEET_URL);
    }

    #[test]
    fn f_is_remote() {
        assert!(is_remote("http://x"));
        assert!(!is_remote("file.csv"));
        assert!(!is_remote("ftp://x"));
    }
}
