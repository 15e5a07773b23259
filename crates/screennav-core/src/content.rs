//! Content identifiers and loaded markup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Loader-relative path of a screen or subpage, e.g. `screens/connect.html`.
///
/// Both stacks store these; the loader resolves them against its own root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentPath(String);

impl ContentPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Markup fetched for a [`ContentPath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub path: ContentPath,
    pub markup: String,
}

impl Content {
    pub fn new(path: ContentPath, markup: impl Into<String>) -> Self {
        Self {
            path,
            markup: markup.into(),
        }
    }
}
