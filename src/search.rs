//! Literal substring search over note names and contents.
//!
//! Search is a full scan: every note is read and tested with a
//! case-sensitive `contains` against both its file name and its body.
//! There is no tokenisation and no ranking; results keep the store's
//! enumeration order.
//!
//! Opening by query goes through [`resolve_open`], which picks the single
//! match or defers to a [`Selector`] when several notes match. The selector
//! is a trait so scripts and tests can supply the choice up front instead of
//! answering a prompt on stdin.

use std::io::{BufRead, Write};
use tracing::debug;

use crate::error::{Result, ZettelError};
use crate::models::NoteRef;
use crate::store::NoteStore;

/// Whether a note with this name and content matches `query`.
pub fn note_matches(note: &NoteRef, content: &str, query: &str) -> bool {
    !query.is_empty() && (note.file_name().contains(query) || content.contains(query))
}

/// All notes whose file name or content contains `query`.
pub fn search(store: &NoteStore, query: &str) -> Result<Vec<NoteRef>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for note in store.list_notes()? {
        let content = store.read(&note)?;
        if note_matches(&note, &content, query) {
            matches.push(note);
        }
    }

    debug!(query, matches = matches.len(), "search complete");
    Ok(matches)
}

/// Chooses one of several candidate notes.
pub trait Selector {
    /// Return a 1-based index into `candidates`.
    fn select(&mut self, candidates: &[NoteRef]) -> Result<usize>;
}

/// A choice fixed ahead of time, e.g. from `--pick`.
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl Selector for FixedSelector {
    fn select(&mut self, _candidates: &[NoteRef]) -> Result<usize> {
        Ok(self.0)
    }
}

/// Prints a numbered list and reads one line holding the choice.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptSelector<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr so stdout stays clean for the chosen path.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Selector for PromptSelector<R, W> {
    fn select(&mut self, candidates: &[NoteRef]) -> Result<usize> {
        let write_err = |e| ZettelError::io("Failed to write prompt", e);
        for (i, note) in candidates.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, note.file_name()).map_err(write_err)?;
        }
        write!(self.output, "Select a note: ").map_err(write_err)?;
        self.output.flush().map_err(write_err)?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| ZettelError::io("Failed to read selection", e))?;

        let answer = line.trim();
        answer
            .parse::<usize>()
            .map_err(|_| ZettelError::InvalidChoice(format!("'{}' is not a number", answer)))
    }
}

/// Pick the note to open from the results of a search for `query`.
///
/// No matches is an error; a single match is returned directly; otherwise
/// the selector's choice is validated against the candidate count.
pub fn resolve_open(
    query: &str,
    mut matches: Vec<NoteRef>,
    selector: &mut dyn Selector,
) -> Result<NoteRef> {
    match matches.len() {
        0 => Err(ZettelError::NoMatches(query.to_string())),
        1 => Ok(matches.remove(0)),
        n => {
            let choice = selector.select(&matches)?;
            if choice < 1 || choice > n {
                return Err(ZettelError::InvalidChoice(format!(
                    "{} is not between 1 and {}",
                    choice, n
                )));
            }
            Ok(matches.swap_remove(choice - 1))
        }
    }
}
