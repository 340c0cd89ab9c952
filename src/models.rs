//! Core data types shared by the store, search, and tag modules.

use std::path::PathBuf;

/// A note file located in the store.
///
/// `id` is the file stem: the file name with the note extension removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NoteRef {
    pub id: String,
    pub path: PathBuf,
}

impl NoteRef {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// File name including the extension, as shown by `list`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.id.clone())
    }
}
