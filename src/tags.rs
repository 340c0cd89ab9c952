//! Hashtag extraction and tag-filtered index notes.
//!
//! Tags are never stored. They are pulled out of note text on every call:
//! a tag is a whitespace-delimited token of the form `#` followed by one or
//! more ASCII letters or digits. `#tag!`, `#über` and `foo#bar` are not tags.
//!
//! Index filtering is deliberately looser than extraction: a note qualifies
//! for a filter tag when its raw content contains `#<tag>` anywhere.

use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, ZettelError};
use crate::id::note_stem;
use crate::link::render_link_token;
use crate::models::NoteRef;
use crate::store::NoteStore;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[A-Za-z0-9]+$").unwrap_or_else(|_| unreachable!()));

/// Canonical tags present in `content`.
pub fn extract_tags(content: &str) -> BTreeSet<String> {
    content
        .split_whitespace()
        .filter(|word| TAG_PATTERN.is_match(word))
        .map(str::to_string)
        .collect()
}

/// Union of tags across every note in the store.
pub fn list_all_tags(store: &NoteStore) -> Result<BTreeSet<String>> {
    let mut tags = BTreeSet::new();
    for note in store.list_notes()? {
        tags.extend(extract_tags(&store.read(&note)?));
    }
    Ok(tags)
}

/// Trim and strip an optional leading `#` so ` project` and `#project`
/// filter alike.
fn bare_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix('#').unwrap_or(tag)
}

/// True when `content` mentions `#<tag>` for any of `tags`.
pub fn note_matches_tags<S: AsRef<str>>(content: &str, tags: &[S]) -> bool {
    tags.iter().any(|tag| {
        let tag = bare_tag(tag.as_ref());
        !tag.is_empty() && content.contains(&format!("#{}", tag))
    })
}

/// Notes matching any of `tags`, in store enumeration order.
pub fn notes_with_tags<S: AsRef<str>>(store: &NoteStore, tags: &[S]) -> Result<Vec<NoteRef>> {
    let mut matches = Vec::new();
    for note in store.list_notes()? {
        if note_matches_tags(&store.read(&note)?, tags) {
            matches.push(note);
        }
    }
    Ok(matches)
}

/// Body of an index note: a heading followed by one link per note.
pub fn render_index(title: &str, notes: &[NoteRef]) -> String {
    let links: Vec<String> = notes
        .iter()
        .map(|n| format!("- {}", render_link_token(&n.id)))
        .collect();
    format!("# {}\n\n{}\n", title, links.join("\n"))
}

/// Create an index note linking every note tagged with any of `tags`.
///
/// Matching runs before the index is written, so the new note never lists
/// itself. The caller is responsible for opening it in the editor.
pub fn build_index<S: AsRef<str>>(
    store: &NoteStore,
    config: &Config,
    now: NaiveDateTime,
    title: &str,
    tags: &[S],
) -> Result<NoteRef> {
    let title = title.trim();
    let has_tag = tags.iter().any(|t| !bare_tag(t.as_ref()).is_empty());
    if title.is_empty() || !has_tag {
        return Err(ZettelError::Usage(
            "title and at least one tag are required".to_string(),
        ));
    }

    let matches = notes_with_tags(store, tags)?;
    let stem = note_stem(now, config.id_precision, Some(title), config.slug_separator);
    debug!(index = %stem, matched = matches.len(), "building tag index");

    store.create_note(&stem, &render_index(title, &matches))
}
