//! Note identifiers and file-name stems.
//!
//! A note ID is a fixed-width local timestamp (`20260118093005`), so IDs sort
//! lexicographically in creation order. A titled note appends a slug of the
//! title: `20260118093005-reading-list`. Nothing here checks for collisions;
//! two notes created inside the same precision window share an ID.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Characters that are never allowed to reach a file name.
const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Timestamp granularity used for generated IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// `YYYYMMDDHHMMSS`
    #[default]
    Seconds,
    /// `YYYYMMDDHHMM`
    Minutes,
}

impl Precision {
    fn format(self) -> &'static str {
        match self {
            Precision::Seconds => "%Y%m%d%H%M%S",
            Precision::Minutes => "%Y%m%d%H%M",
        }
    }
}

/// Format `now` as a sortable note ID.
pub fn generate_id(now: NaiveDateTime, precision: Precision) -> String {
    now.format(precision.format()).to_string()
}

/// Turn a free-form title into a file-name-safe fragment.
///
/// Whitespace, control characters and path or shell-hostile characters
/// become `separator`; runs collapse to a single separator and the result
/// never starts or ends with one.
pub fn slugify(title: &str, separator: char) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;

    for c in title.chars() {
        if c.is_whitespace() || c.is_control() || UNSAFE_CHARS.contains(&c) || c == separator {
            pending_sep = !slug.is_empty();
            continue;
        }
        if pending_sep {
            slug.push(separator);
            pending_sep = false;
        }
        slug.push(c);
    }

    slug
}

/// File-name stem for a new note: `<id>` or `<id><sep><slug>`.
pub fn note_stem(
    now: NaiveDateTime,
    precision: Precision,
    title: Option<&str>,
    separator: char,
) -> String {
    let id = generate_id(now, precision);
    match title.map(|t| slugify(t, separator)) {
        Some(slug) if !slug.is_empty() => format!("{}{}{}", id, separator, slug),
        _ => id,
    }
}

/// Whether `sep` may be used as a slug separator.
pub fn is_valid_separator(sep: char) -> bool {
    !(sep.is_whitespace() || sep.is_control() || UNSAFE_CHARS.contains(&sep) || sep == '.')
}
