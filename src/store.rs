//! Flat-directory note store.
//!
//! Every note is one file named `<id>.<extension>` inside the configured
//! notes directory. Nothing is cached: each call re-reads the filesystem.
//! Listing is non-recursive unless the config enables `recursive`, in which
//! case subdirectories are walked and exclude globs applied to paths
//! relative to the root. Symlinked notes are listed like regular files
//! unless `follow_symlinks` is turned off.

use globset::GlobSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, ZettelError};
use crate::models::NoteRef;

#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
    extension: String,
    recursive: bool,
    follow_symlinks: bool,
    excludes: GlobSet,
}

impl NoteStore {
    /// Open the store, creating the notes directory if it is missing.
    pub fn open(config: &Config) -> Result<Self> {
        let root = config.notes_dir.clone();
        std::fs::create_dir_all(&root)
            .map_err(|e| ZettelError::io_at("Failed to create notes directory", &root, e))?;

        let excludes = config
            .exclude_set()
            .map_err(|e| ZettelError::Config(format!("{:#}", e)))?;

        debug!(root = %root.display(), recursive = config.recursive, "opened note store");
        Ok(Self {
            root,
            extension: config.extension.clone(),
            recursive: config.recursive,
            follow_symlinks: config.follow_symlinks,
            excludes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<stem>.<extension>`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }

    /// Path a note with this ID lives at (whether or not it exists).
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(self.file_name(id))
    }

    fn checked_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(ZettelError::Usage(format!("invalid note ID: '{}'", id)));
        }
        Ok(self.path_for(id))
    }

    /// Stat-based existence check.
    pub fn note_exists(&self, id: &str) -> bool {
        self.checked_path(id).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Write a new note, replacing any file with the same stem.
    pub fn create_note(&self, stem: &str, content: &str) -> Result<NoteRef> {
        let path = self.checked_path(stem)?;
        std::fs::write(&path, content)
            .map_err(|e| ZettelError::io_at("Failed to create note", &path, e))?;
        debug!(id = stem, path = %path.display(), "created note");
        Ok(NoteRef::new(stem, path))
    }

    /// Look up an existing note by ID.
    pub fn get(&self, id: &str) -> Result<NoteRef> {
        let path = self.checked_path(id)?;
        if !path.is_file() {
            return Err(ZettelError::NotFound(id.to_string()));
        }
        Ok(NoteRef::new(id, path))
    }

    pub fn read_note(&self, id: &str) -> Result<String> {
        let note = self.get(id)?;
        self.read(&note)
    }

    /// Raw note content. Bytes that are not valid UTF-8 are replaced, so a
    /// legacy-encoded note still takes part in scans.
    pub fn read(&self, note: &NoteRef) -> Result<String> {
        let bytes = std::fs::read(&note.path)
            .map_err(|e| ZettelError::io_at("Failed to read note", &note.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Append `text` to an existing note in a single write.
    ///
    /// The file is opened in append mode and never created, so a missing
    /// note is reported instead of silently materialised.
    pub fn append(&self, id: &str, text: &str) -> Result<()> {
        let note = self.get(id)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&note.path)
            .map_err(|e| ZettelError::io_at("Failed to open note", &note.path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| ZettelError::io_at("Failed to write note", &note.path, e))?;
        Ok(())
    }

    /// Every note file in the store, sorted by path.
    ///
    /// Any directory or metadata error aborts the listing, including a
    /// dangling symlink when links are followed.
    pub fn list_notes(&self) -> Result<Vec<NoteRef>> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut notes = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.follow_symlinks);
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                ZettelError::io_at("Failed to list notes in", &path, source)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if self.excludes.is_match(relative) {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }

            let id = match path.file_stem() {
                Some(stem) => stem.to_string_lossy().to_string(),
                None => continue,
            };
            notes.push(NoteRef::new(id, path));
        }

        notes.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = notes.len(), "listed notes");
        Ok(notes)
    }
}
