//! Launching the user's editor.
//!
//! The editor is an opaque collaborator: given a path it runs in the
//! foreground on the caller's terminal and either exits cleanly or not.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::{Result, ZettelError};

pub trait Editor {
    /// Edit `path`, blocking until the editor exits.
    fn open(&self, path: &Path) -> Result<()>;
}

/// Runs an editor command line such as `vi` or `code --wait`.
///
/// The command is split on whitespace; the note path is appended as the
/// final argument. Stdio is inherited from this process.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Editor for CommandEditor {
    fn open(&self, path: &Path) -> Result<()> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ZettelError::Config("editor command is empty".to_string()))?;

        debug!(editor = %self.command, path = %path.display(), "launching editor");
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ZettelError::io(format!("Failed to launch editor '{}'", program), e))?;

        if !status.success() {
            return Err(ZettelError::EditorFailed {
                editor: self.command.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Editor that does nothing; used for `--no-edit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEditor;

impl Editor for NoEditor {
    fn open(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_editor() {
        CommandEditor::new("true").open(Path::new("/tmp/x.md")).unwrap();
    }

    #[test]
    fn test_failing_editor() {
        let err = CommandEditor::new("false").open(Path::new("/tmp/x.md")).unwrap_err();
        assert!(matches!(err, ZettelError::EditorFailed { .. }));
    }

    #[test]
    fn test_editor_arguments_precede_path() {
        // `test -n <path>` succeeds only when the path argument is present.
        CommandEditor::new("test -n").open(Path::new("/tmp/x.md")).unwrap();
    }

    #[test]
    fn test_missing_editor_binary() {
        let err = CommandEditor::new("definitely-not-an-editor-zz")
            .open(Path::new("/tmp/x.md"))
            .unwrap_err();
        assert!(matches!(err, ZettelError::Io { .. }));
    }

    #[test]
    fn test_empty_command() {
        let err = CommandEditor::new("  ").open(Path::new("/tmp/x.md")).unwrap_err();
        assert!(matches!(err, ZettelError::Config(_)));
    }
}
