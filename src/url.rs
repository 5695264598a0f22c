//! Sharing-link to CSV-export URL rewriting
//!
//! Best effort: anything that already looks like CSV, or that is not a
//! spreadsheet-by-ID link, passes through untouched.

use std::sync::OnceLock;

use regex::Regex;

fn sheet_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9\-_]+)").ok())
        .as_ref()
}

fn gid_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[?&]gid=(\d+)").ok())
        .as_ref()
}

/// Whether a URL already points at CSV content
pub fn looks_like_csv(url: &str) -> bool {
    url.ends_with(".csv") || url.contains("output=csv") || url.contains("format=csv")
}

/// Rewrite a spreadsheet link into its CSV export form.
///
/// The sheet tab comes from a `gid` query parameter, `0` when absent.
///
/// # Example
///
/// ```
/// use sheetgrid::url::build_csv_url;
///
/// let url = build_csv_url("https://docs.google.com/spreadsheets/d/abc-123/edit?gid=42#gid=42");
/// assert_eq!(url, "https://docs.google.com/spreadsheets/d/abc-123/export?format=csv&gid=42");
/// ```
pub fn build_csv_url(input: &str) -> String {
    if input.is_empty() || looks_like_csv(input) {
        return input.to_string();
    }

    let Some(id) = sheet_id_pattern()
        .and_then(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return input.to_string();
    };

    let gid = gid_pattern()
        .and_then(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map_or("0", |m| m.as_str());

    format!("https://docs.google.com/spreadsheets/d/{id}/export?format=csv&gid={gid}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_url_empty_passthrough() {
        assert_eq!(build_csv_url(""), "");
    }

    #[test]
    fn f_url_csv_passthrough() {
        for url in [
            "https://example.com/data.csv",
            "https://docs.google.com/spreadsheets/d/e/XYZ/pub?output=csv",
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=5",
        ] {
            assert_eq!(build_csv_url(url), url, "FALSIFIED: {url} must pass through");
        }
    }

    #[test]
    fn f_url_edit_link_default_gid() {
        let url = build_csv_url("https://docs.google.com/spreadsheets/d/1gY_QQ16-x/edit");
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/1gY_QQ16-x/export?format=csv&gid=0"
        );
    }

    #[test]
    fn f_url_edit_link_with_gid() {
        let url = build_csv_url("https://docs.google.com/spreadsheets/d/abc/edit?usp=sharing&gid=1234");
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=1234"
        );
    }

    #[test]
    fn f_url_fragment_gid_only_is_ignored() {
        let url = build_csv_url("https://docs.google.com/spreadsheets/d/abc/edit#gid=99");
        assert!(url.ends_with("gid=0"));
    }

    #[test]
    fn f_url_other_passthrough() {
        let url = "https://example.com/some/page";
        assert_eq!(build_csv_url(url), url);
    }

    #[test]
    fn f_looks_like_csv() {
        assert!(looks_like_csv("/tmp/sheet.csv"));
        assert!(!looks_like_csv("/tmp/sheet.json"));
    }
}
