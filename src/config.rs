//! Configuration loading.
//!
//! Settings come from an optional TOML file, then environment overrides
//! (`ZETTEL_HOME`, `VISUAL`, `EDITOR`), then built-in defaults. The result is
//! a [`Config`] resolved once in `main` and passed by reference to every
//! operation.
//!
//! ```toml
//! notes_dir = "~/notes"
//! extension = "md"
//! id_precision = "seconds"   # or "minutes"
//! slug_separator = "-"
//! recursive = false
//! follow_symlinks = true
//! exclude_globs = ["archive/**"]
//! editor = "nvim"
//! fallback_editor = "vi"
//! ```

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ZettelError;
use crate::id::{is_valid_separator, Precision};

/// Default notes directory name under the user's home.
pub const DEFAULT_DIR_NAME: &str = "zettelkasten";

/// Raw file contents; every field is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub notes_dir: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub id_precision: Precision,
    #[serde(default = "default_separator")]
    pub slug_separator: char,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default = "default_fallback_editor")]
    pub fallback_editor: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            notes_dir: None,
            extension: default_extension(),
            id_precision: Precision::default(),
            slug_separator: default_separator(),
            recursive: false,
            follow_symlinks: default_follow_symlinks(),
            exclude_globs: Vec::new(),
            editor: None,
            fallback_editor: default_fallback_editor(),
        }
    }
}

fn default_extension() -> String {
    "md".to_string()
}
fn default_separator() -> char {
    '-'
}
fn default_follow_symlinks() -> bool {
    true
}
fn default_fallback_editor() -> String {
    "vi".to_string()
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub notes_dir: PathBuf,
    /// Note file extension without the leading dot.
    pub extension: String,
    pub id_precision: Precision,
    pub slug_separator: char,
    pub recursive: bool,
    /// List symlinked notes as if they were regular files.
    pub follow_symlinks: bool,
    pub exclude_globs: Vec<String>,
    /// Editor command line; the note path is appended as the last argument.
    pub editor: String,
}

impl Config {
    /// Defaults rooted at `notes_dir`, ignoring the environment.
    pub fn with_notes_dir(notes_dir: impl Into<PathBuf>) -> Self {
        let file = ConfigFile::default();
        Self {
            notes_dir: notes_dir.into(),
            extension: file.extension,
            id_precision: file.id_precision,
            slug_separator: file.slug_separator,
            recursive: file.recursive,
            follow_symlinks: file.follow_symlinks,
            exclude_globs: file.exclude_globs,
            editor: file.fallback_editor,
        }
    }

    /// Compile the exclude globs, always skipping VCS and tool metadata.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut patterns = vec!["**/.git/**".to_string(), ".zettel/**".to_string()];
        patterns.extend(self.exclude_globs.iter().cloned());
        build_globset(&patterns)
    }
}

/// Load and resolve configuration.
///
/// `explicit` is the `--config` flag. Without it, `$ZETTEL_CONFIG` is tried,
/// then `<config dir>/zettel/config.toml` if that file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    let base_dirs = directories::BaseDirs::new();

    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => env("ZETTEL_CONFIG").map(PathBuf::from).or_else(|| {
            base_dirs
                .as_ref()
                .map(|d| d.config_dir().join("zettel").join("config.toml"))
                .filter(|p| p.is_file())
        }),
    };

    let file = match path {
        Some(p) => read_config_file(&p)?,
        None => ConfigFile::default(),
    };

    let home = base_dirs.map(|d| d.home_dir().to_path_buf());
    resolve(file, env, home)
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(file)
}

/// Apply environment overrides and validate.
///
/// `env` looks up a variable and returns `None` when it is unset or blank.
pub fn resolve<F>(file: ConfigFile, env: F, home: Option<PathBuf>) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let notes_dir = match env("ZETTEL_HOME").map(PathBuf::from).or(file.notes_dir) {
        Some(dir) => expand_home(&dir, home.as_deref())?,
        None => match home {
            Some(h) => h.join(DEFAULT_DIR_NAME),
            None => {
                return Err(ZettelError::Config(
                    "cannot determine home directory; set ZETTEL_HOME".to_string(),
                )
                .into())
            }
        },
    };

    let extension = file.extension.trim_start_matches('.').to_string();
    if extension.is_empty() {
        bail!("extension must not be empty");
    }
    if extension.contains(['.', '/', '\\']) {
        bail!("extension must be a single suffix, got '{}'", file.extension);
    }

    if !is_valid_separator(file.slug_separator) {
        bail!(
            "slug_separator '{}' is not allowed in file names",
            file.slug_separator.escape_default()
        );
    }

    build_globset(&file.exclude_globs).context("Invalid exclude_globs")?;

    let editor = file
        .editor
        .filter(|e| !e.trim().is_empty())
        .or_else(|| env("VISUAL"))
        .or_else(|| env("EDITOR"))
        .unwrap_or(file.fallback_editor);
    if editor.trim().is_empty() {
        bail!("fallback_editor must not be empty");
    }

    Ok(Config {
        notes_dir,
        extension,
        id_precision: file.id_precision,
        slug_separator: file.slug_separator,
        recursive: file.recursive,
        follow_symlinks: file.follow_symlinks,
        exclude_globs: file.exclude_globs,
        editor,
    })
}

/// Expand a leading `~` against the home directory.
fn expand_home(path: &Path, home: Option<&Path>) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => match home {
            Some(h) => Ok(h.join(rest)),
            None => Err(ZettelError::Config(format!(
                "cannot expand '{}' without a home directory",
                path.display()
            ))
            .into()),
        },
        Err(_) => Ok(path.to_path_buf()),
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
