//! Rebuildable tag side-index.
//!
//! `zettel reindex` scans the store and writes `<notes>/.zettel/tags.json`,
//! mapping each tag to the IDs of the notes that carry it. The scan stays the
//! source of truth: nothing updates the cache except an explicit rebuild, and
//! `zettel tags` only consults it when asked with `--cached`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{Result, ZettelError};
use crate::store::NoteStore;
use crate::tags::extract_tags;

pub const CACHE_DIR: &str = ".zettel";
pub const CACHE_FILE: &str = "tags.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCache {
    pub generated_at: DateTime<Utc>,
    /// Tag (with `#`) to note IDs, in store enumeration order.
    pub tags: BTreeMap<String, Vec<String>>,
}

impl TagCache {
    pub fn note_count(&self) -> usize {
        let mut ids: Vec<&String> = self.tags.values().flatten().collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }
}

pub fn cache_path(store: &NoteStore) -> PathBuf {
    store.root().join(CACHE_DIR).join(CACHE_FILE)
}

/// Scan every note and group note IDs by tag.
pub fn build_cache(store: &NoteStore, now: DateTime<Utc>) -> Result<TagCache> {
    let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for note in store.list_notes()? {
        for tag in extract_tags(&store.read(&note)?) {
            tags.entry(tag).or_default().push(note.id.clone());
        }
    }
    Ok(TagCache {
        generated_at: now,
        tags,
    })
}

/// Rebuild and persist the cache.
pub fn rebuild(store: &NoteStore, now: DateTime<Utc>) -> Result<TagCache> {
    let cache = build_cache(store, now)?;
    let path = cache_path(store);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ZettelError::io_at("Failed to create cache directory", parent, e))?;
    }

    let json = serde_json::to_string_pretty(&cache).map_err(|e| ZettelError::Cache {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(&path, json)
        .map_err(|e| ZettelError::io_at("Failed to write tag cache", &path, e))?;

    debug!(path = %path.display(), tags = cache.tags.len(), "wrote tag cache");
    Ok(cache)
}

/// Load the cache, or `None` if it has never been built.
pub fn load(store: &NoteStore) -> Result<Option<TagCache>> {
    let path = cache_path(store);
    if !path.is_file() {
        warn!(path = %path.display(), "tag cache missing; run `zettel reindex`");
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| ZettelError::io_at("Failed to read tag cache", &path, e))?;
    let cache = serde_json::from_str(&content).map_err(|e| ZettelError::Cache {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(cache))
}
