//! Command implementations behind the `zettel` binary.
//!
//! Each `run_*` function performs one operation against the store and
//! prints its result on stdout. File names and IDs are printed bare, one
//! per line, so the output can be piped into other tools.

use anyhow::{Context, Result};
use chrono::{Local, Utc};

use crate::config::Config;
use crate::editor::Editor;
use crate::id::{generate_id, note_stem};
use crate::link::link_notes;
use crate::models::NoteRef;
use crate::search::{resolve_open, search, Selector};
use crate::store::NoteStore;
use crate::tag_cache;
use crate::tags::{build_index, list_all_tags};

/// Placeholder tag seeded into titled notes.
pub const PLACEHOLDER_TAG: &str = "#tagme";

/// Initial body for a new note.
pub fn seed_content(id: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("# {}\n\n{}\n\n", title, PLACEHOLDER_TAG),
        None => format!("# {}\n", id),
    }
}

/// Create a note, print its file name, then open it.
pub fn run_new(
    config: &Config,
    store: &NoteStore,
    editor: &dyn Editor,
    title: Option<&str>,
) -> Result<NoteRef> {
    let now = Local::now().naive_local();
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let stem = note_stem(now, config.id_precision, title, config.slug_separator);
    let id = generate_id(now, config.id_precision);

    let note = store.create_note(&stem, &seed_content(&id, title))?;
    println!("{}", note.file_name());

    editor
        .open(&note.path)
        .with_context(|| format!("Created {} but the editor failed", note.file_name()))?;
    Ok(note)
}

/// Open an existing note by exact ID.
pub fn run_edit(store: &NoteStore, editor: &dyn Editor, id: &str) -> Result<()> {
    let note = store.get(id)?;
    editor.open(&note.path)?;
    Ok(())
}

/// Open a note by ID or, failing that, by search query.
pub fn run_open(
    store: &NoteStore,
    editor: &dyn Editor,
    query: &str,
    selector: &mut dyn Selector,
) -> Result<NoteRef> {
    let note = if store.note_exists(query) {
        store.get(query)?
    } else {
        let matches = search(store, query)?;
        resolve_open(query, matches, selector)?
    };
    println!("{}", note.path.display());
    editor.open(&note.path)?;
    Ok(note)
}

pub fn run_list(store: &NoteStore) -> Result<()> {
    for note in store.list_notes()? {
        println!("{}", note.file_name());
    }
    Ok(())
}

pub fn run_search(store: &NoteStore, query: &str) -> Result<()> {
    let matches = search(store, query)?;
    if matches.is_empty() {
        eprintln!("No matching notes.");
    }
    for note in matches {
        println!("{}", note.id);
    }
    Ok(())
}

pub fn run_link(store: &NoteStore, source: &str, target: &str) -> Result<()> {
    link_notes(store, source, target)
        .with_context(|| format!("Failed to link {} -> {}", source, target))?;
    println!("Linked {} -> {}", source, target);
    Ok(())
}

/// Build a tag index note, print its file name, then open it.
pub fn run_index(
    config: &Config,
    store: &NoteStore,
    editor: &dyn Editor,
    title: &str,
    tags: &[String],
) -> Result<NoteRef> {
    let now = Local::now().naive_local();
    let index = build_index(store, config, now, title, tags)?;
    println!("{}", index.file_name());
    editor.open(&index.path)?;
    Ok(index)
}

/// Print every unique tag, from a fresh scan or from the tag cache.
pub fn run_tags(store: &NoteStore, cached: bool) -> Result<()> {
    let tags: Vec<String> = if cached {
        match tag_cache::load(store)? {
            Some(cache) => cache.tags.into_keys().collect(),
            None => Vec::new(),
        }
    } else {
        list_all_tags(store)?.into_iter().collect()
    };
    for tag in tags {
        println!("{}", tag);
    }
    Ok(())
}

pub fn run_reindex(store: &NoteStore) -> Result<()> {
    let cache = tag_cache::rebuild(store, Utc::now())?;
    println!(
        "Indexed {} tags across {} notes into {}",
        cache.tags.len(),
        cache.note_count(),
        tag_cache::cache_path(store).display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NoEditor;
    use crate::search::FixedSelector;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config, NoteStore) {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_notes_dir(tmp.path());
        let store = NoteStore::open(&config).unwrap();
        (tmp, config, store)
    }

    #[test]
    fn test_seed_content() {
        assert_eq!(seed_content("2026", None), "# 2026\n");
        assert_eq!(seed_content("2026", Some("Idea")), "# Idea\n\n#tagme\n\n");
    }

    #[test]
    fn test_new_titled_note_exists_after_create() {
        let (_tmp, config, store) = setup();
        let note = run_new(&config, &store, &NoEditor, Some("first idea")).unwrap();
        assert!(note.id.ends_with("-first-idea"));
        assert!(store.note_exists(&note.id));
        assert_eq!(store.read(&note).unwrap(), "# first idea\n\n#tagme\n\n");
    }

    #[test]
    fn test_new_untitled_uses_id_heading() {
        let (_tmp, config, store) = setup();
        let note = run_new(&config, &store, &NoEditor, Some("   ")).unwrap();
        assert_eq!(note.id.len(), 14);
        assert_eq!(store.read(&note).unwrap(), format!("# {}\n", note.id));
    }

    #[test]
    fn test_open_prefers_exact_id() {
        let (_tmp, _config, store) = setup();
        store.create_note("abc", "mentions abcdef").unwrap();
        store.create_note("abcdef", "").unwrap();
        let note = run_open(&store, &NoEditor, "abc", &mut FixedSelector(2)).unwrap();
        assert_eq!(note.id, "abc");
    }

    #[test]
    fn test_open_without_match_fails() {
        let (_tmp, _config, store) = setup();
        store.create_note("a", "alpha").unwrap();
        assert!(run_open(&store, &NoEditor, "omega", &mut FixedSelector(1)).is_err());
    }

    #[test]
    fn test_edit_missing_note() {
        let (_tmp, _config, store) = setup();
        let err = run_edit(&store, &NoEditor, "nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_tags_cached_and_scanned_agree() {
        let (_tmp, _config, store) = setup();
        store.create_note("a", "#one #two").unwrap();
        run_reindex(&store).unwrap();
        run_tags(&store, true).unwrap();
        run_tags(&store, false).unwrap();
        let cache = tag_cache::load(&store).unwrap().unwrap();
        let scanned: Vec<String> = list_all_tags(&store).unwrap().into_iter().collect();
        assert_eq!(cache.tags.into_keys().collect::<Vec<_>>(), scanned);
    }
}
