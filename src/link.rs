//! Directed links between notes.
//!
//! A link is the text `[[target-id]]` inside the source note. Linking only
//! ever appends; there is no back-link, duplicate check, or cycle check.

use tracing::debug;

use crate::error::{Result, ZettelError};
use crate::store::NoteStore;

/// The inline reference token for `target`.
pub fn render_link_token(target: &str) -> String {
    format!("[[{}]]", target)
}

/// Append a link to `target` at the end of `source`.
///
/// Both notes must exist. If either is missing the source file is not
/// touched.
pub fn link_notes(store: &NoteStore, source: &str, target: &str) -> Result<()> {
    if !store.note_exists(source) {
        return Err(ZettelError::NotFound(source.to_string()));
    }
    if !store.note_exists(target) {
        return Err(ZettelError::NotFound(target.to_string()));
    }

    store.append(source, &format!("\n{}\n", render_link_token(target)))?;
    debug!(source, target, "linked notes");
    Ok(())
}
