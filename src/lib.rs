//! # zettel
//!
//! A small zettelkasten tool: timestamped Markdown notes in one directory,
//! linked with `[[id]]` tokens and tagged with `#hashtags`.
//!
//! Nothing is persisted besides the notes themselves (and an optional tag
//! cache rebuilt on demand). Every command re-scans the notes directory.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML + environment configuration |
//! | [`id`] | Timestamp IDs and title slugs |
//! | [`store`] | Note files on disk |
//! | [`search`] | Substring search and open-by-query resolution |
//! | [`tags`] | Tag extraction and index notes |
//! | [`tag_cache`] | Rebuildable tag to note side-index |
//! | [`link`] | Appending links between notes |
//! | [`editor`] | External editor invocation |
//! | [`commands`] | CLI command implementations |

pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod id;
pub mod link;
pub mod models;
pub mod search;
pub mod store;
pub mod tag_cache;
pub mod tags;

pub use error::{Result, ZettelError};
