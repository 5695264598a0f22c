//! Navigation routes
//!
//! The grid lives at `/`; a selected row's detail view lives at
//! `/models/{index}`. The index only identifies the route. The detail content
//! always comes from the stored selection snapshot.

use std::fmt;

/// A screen of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// The searchable table
    #[default]
    Grid,
    /// Detail view of the row at `index` in the displayed sequence
    Detail {
        /// Index into the displayed (filtered) rows at selection time
        index: usize,
    },
}

impl Route {
    /// URL-style path of the route
    pub fn path(&self) -> String {
        match self {
            Self::Grid => "/".to_string(),
            Self::Detail { index } => format!("/models/{index}"),
        }
    }

    /// Parse a path produced by [`Route::path`]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Grid);
        }
        let index = trimmed.strip_prefix("/models/")?;
        index.parse().ok().map(|index| Self::Detail { index })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_route_paths() {
        assert_eq!(Route::Grid.path(), "/");
        assert_eq!(Route::Detail { index: 3 }.path(), "/models/3");
        assert_eq!(Route::Detail { index: 0 }.to_string(), "/models/0");
    }

    #[test]
    fn f_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Grid));
        assert_eq!(Route::parse(""), Some(Route::Grid));
        assert_eq!(Route::parse("/models/12"), Some(Route::Detail { index: 12 }));
        assert_eq!(Route::parse("/models/12/"), Some(Route::Detail { index: 12 }));
    }

    #[test]
    fn f_route_parse_rejects_garbage() {
        assert_eq!(Route::parse("/models/abc"), None);
        assert_eq!(Route::parse("/models/-1"), None);
        assert_eq!(Route::parse("/other/1"), None);
    }

    #[test]
    fn f_route_default_is_grid() {
        assert_eq!(Route::default(), Route::Grid);
    }
}
