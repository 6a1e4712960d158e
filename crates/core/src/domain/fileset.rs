use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key signalling that generation produced no usable files.
pub const SENTINEL_ERROR_KEY: &str = "error";

/// Relative file path to full text content.
///
/// Backed by a `BTreeMap` so that publishing walks files in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet {
    files: BTreeMap<String, String>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file set holding only the sentinel error entry.
    pub fn error(message: impl Into<String>) -> Self {
        let mut files = BTreeMap::new();
        files.insert(SENTINEL_ERROR_KEY.to_string(), message.into());
        Self { files }
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.files.insert(path.into(), content.into())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Message carried by the sentinel entry, if present.
    pub fn error_message(&self) -> Option<&str> {
        self.get(SENTINEL_ERROR_KEY)
    }

    /// True when the set carries nothing but the sentinel entry.
    pub fn is_error(&self) -> bool {
        self.error_message().is_some() && self.publishable().next().is_none()
    }

    /// Entries that should be written to the repository, in path order.
    pub fn publishable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .filter(|(path, _)| path.as_str() != SENTINEL_ERROR_KEY)
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}
