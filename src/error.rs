//! Error taxonomy for note operations.
//!
//! Library functions return [`ZettelError`] so callers can tell a missing
//! note from a usage mistake or a filesystem failure. Command glue wraps
//! these in `anyhow` and `main` prints the chain to stderr.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZettelError {
    /// Unusable configuration (no home directory, bad config values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or malformed arguments.
    #[error("{0}")]
    Usage(String),

    /// A referenced note ID has no file in the store.
    #[error("note does not exist: {0}")]
    NotFound(String),

    /// An open-by-query found nothing.
    #[error("no matching notes found for '{0}'")]
    NoMatches(String),

    /// Interactive selection was not a number in range.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// The editor process ran but exited unsuccessfully.
    #[error("editor '{editor}' exited with {status}")]
    EditorFailed { editor: String, status: String },

    /// The tag cache file could not be encoded or decoded.
    #[error("tag cache {path} is unusable")]
    Cache {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ZettelError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ZettelError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("{} {}", action, path.display()), source)
    }
}

pub type Result<T> = std::result::Result<T, ZettelError>;
