use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn zettel_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("zettel");
    path
}

struct TestEnv {
    tmp: TempDir,
    editor: String,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("notes")).unwrap();
        Self {
            tmp,
            editor: "true".to_string(),
        }
    }

    fn with_editor(editor: &str) -> Self {
        let mut env = Self::new();
        env.editor = editor.to_string();
        env
    }

    fn notes(&self) -> PathBuf {
        self.tmp.path().join("notes")
    }

    fn write_note(&self, name: &str, content: &str) {
        fs::write(self.notes().join(name), content).unwrap();
    }

    fn read_note(&self, name: &str) -> String {
        fs::read_to_string(self.notes().join(name)).unwrap()
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(zettel_binary());
        cmd.args(args)
            .env("ZETTEL_HOME", self.notes())
            .env("HOME", self.tmp.path())
            .env("EDITOR", &self.editor)
            .env_remove("VISUAL")
            .env_remove("ZETTEL_CONFIG")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> (String, String, bool) {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .unwrap_or_else(|e| panic!("Failed to run zettel at {:?}: {}", zettel_binary(), e));
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.success(),
        )
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> (String, String, bool) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.success(),
        )
    }
}

fn note_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".md"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_new_titled_note() {
    let env = TestEnv::new();
    let (stdout, stderr, success) = env.run(&["new", "reading", "list"]);
    assert!(success, "new failed: stdout={}, stderr={}", stdout, stderr);

    let name = stdout.trim();
    assert!(name.ends_with("-reading-list.md"), "unexpected name: {}", name);
    assert_eq!(note_files(&env.notes()), vec![name.to_string()]);
    assert_eq!(env.read_note(name), "# reading list\n\n#tagme\n\n");
}

#[test]
fn test_new_untitled_note() {
    let env = TestEnv::new();
    let (stdout, _, success) = env.run(&["new"]);
    assert!(success);
    let name = stdout.trim();
    let id = name.trim_end_matches(".md");
    assert_eq!(id.len(), 14);
    assert!(id.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(env.read_note(name), format!("# {}\n", id));
}

#[test]
fn test_new_creates_missing_directory() {
    let env = TestEnv::new();
    fs::remove_dir_all(env.notes()).unwrap();
    let (_, _, success) = env.run(&["new", "fresh"]);
    assert!(success);
    assert_eq!(note_files(&env.notes()).len(), 1);
}

#[test]
fn test_failing_editor_reports_error() {
    let env = TestEnv::with_editor("false");
    let (_, stderr, success) = env.run(&["new", "doomed"]);
    assert!(!success);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
    assert!(stderr.contains("editor"), "stderr: {}", stderr);
    // The note itself was still written.
    assert_eq!(note_files(&env.notes()).len(), 1);
}

#[test]
fn test_edit_existing_and_missing() {
    let env = TestEnv::new();
    env.write_note("20260101120000.md", "# x\n");

    let (_, _, success) = env.run(&["edit", "20260101120000"]);
    assert!(success);

    let (_, stderr, success) = env.run(&["edit", "20990101000000"]);
    assert!(!success);
    assert!(stderr.contains("note does not exist: 20990101000000"), "stderr: {}", stderr);
}

#[test]
fn test_list_notes() {
    let env = TestEnv::new();
    env.write_note("b.md", "");
    env.write_note("a.md", "");
    env.write_note("skip.txt", "");

    let (stdout1, _, success) = env.run(&["list"]);
    assert!(success);
    assert_eq!(stdout1, "a.md\nb.md\n");

    let (stdout2, _, _) = env.run(&["list"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_search_single_and_none() {
    let env = TestEnv::new();
    env.write_note("1.md", "# One\nthe borrow checker");
    env.write_note("2.md", "# Two\ngarbage collection");
    env.write_note("3.md", "# Three\nlifetimes");

    let (stdout, _, success) = env.run(&["search", "borrow", "checker"]);
    assert!(success);
    assert_eq!(stdout, "1\n");

    let (stdout, stderr, success) = env.run(&["search", "monads"]);
    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("No matching notes"));
}

#[test]
fn test_open_no_match_is_error() {
    let env = TestEnv::new();
    env.write_note("1.md", "alpha");
    let (_, stderr, success) = env.run(&["open", "omega"]);
    assert!(!success);
    assert!(stderr.contains("no matching notes found"), "stderr: {}", stderr);
}

#[test]
fn test_open_single_match() {
    let env = TestEnv::new();
    env.write_note("1.md", "alpha");
    env.write_note("2.md", "beta");
    let (stdout, _, success) = env.run(&["open", "beta"]);
    assert!(success);
    assert!(stdout.trim().ends_with("2.md"));
}

#[test]
fn test_open_with_pick() {
    let env = TestEnv::new();
    env.write_note("1.md", "shared");
    env.write_note("2.md", "shared");

    let (stdout, _, success) = env.run(&["open", "shared", "--pick", "2", "--no-edit"]);
    assert!(success);
    assert!(stdout.trim().ends_with("2.md"), "stdout: {}", stdout);

    let (_, stderr, success) = env.run(&["open", "shared", "--pick", "3"]);
    assert!(!success);
    assert!(stderr.contains("invalid choice"));
}

#[test]
fn test_open_prompts_on_stdin() {
    let env = TestEnv::new();
    env.write_note("1.md", "shared");
    env.write_note("2.md", "shared");

    let (stdout, stderr, success) = env.run_with_stdin(&["open", "shared"], "1\n");
    assert!(success, "stderr: {}", stderr);
    assert!(stderr.contains("1. 1.md"));
    assert!(stderr.contains("2. 2.md"));
    assert!(stdout.trim().ends_with("1.md"));

    let (_, stderr, success) = env.run_with_stdin(&["open", "shared"], "nine\n");
    assert!(!success);
    assert!(stderr.contains("invalid choice"));
}

#[test]
fn test_link_notes() {
    let env = TestEnv::new();
    env.write_note("a.md", "# A\n");
    env.write_note("b.md", "# B\n");

    let (stdout, _, success) = env.run(&["link", "a", "b"]);
    assert!(success);
    assert_eq!(stdout, "Linked a -> b\n");
    assert!(env.read_note("a.md").contains("[[b]]"));
    assert_eq!(env.read_note("b.md"), "# B\n");
}

#[test]
fn test_link_missing_target_leaves_source() {
    let env = TestEnv::new();
    env.write_note("a.md", "# A\n");

    let (_, stderr, success) = env.run(&["link", "a", "ghost"]);
    assert!(!success);
    assert!(stderr.contains("note does not exist: ghost"), "stderr: {}", stderr);
    assert_eq!(env.read_note("a.md"), "# A\n");
}

#[test]
fn test_index_links_tagged_notes() {
    let env = TestEnv::new();
    env.write_note("20260101000001.md", "# A\n#project");
    env.write_note("20260101000002.md", "# B\n#other");
    env.write_note("20260101000003.md", "# C\nwork #project");

    let (stdout, stderr, success) = env.run(&["index", "Project Hub", "project"]);
    assert!(success, "stderr: {}", stderr);
    let name = stdout.trim();
    assert!(name.ends_with("-Project-Hub.md"));

    let body = env.read_note(name);
    assert_eq!(
        body,
        "# Project Hub\n\n- [[20260101000001]]\n- [[20260101000003]]\n"
    );
}

#[test]
fn test_index_requires_tags() {
    let env = TestEnv::new();
    let (_, stderr, success) = env.run(&["index", "lonely"]);
    assert!(!success);
    assert!(stderr.contains("at least one tag"), "stderr: {}", stderr);
    assert!(note_files(&env.notes()).is_empty());
}

#[test]
fn test_tags_and_cache() {
    let env = TestEnv::new();
    env.write_note("1.md", "#hello #world! #123 plain");
    env.write_note("2.md", "#hello again");

    let (stdout, _, success) = env.run(&["tags"]);
    assert!(success);
    assert_eq!(stdout, "#123\n#hello\n");

    let (stdout, _, success) = env.run(&["tags", "--cached"]);
    assert!(success);
    assert!(stdout.is_empty());

    let (stdout, _, success) = env.run(&["reindex"]);
    assert!(success);
    assert!(stdout.contains("Indexed 2 tags across 2 notes"), "stdout: {}", stdout);

    let (stdout, _, _) = env.run(&["tags", "--cached"]);
    assert_eq!(stdout, "#123\n#hello\n");
}

#[test]
fn test_config_file() {
    let env = TestEnv::new();
    let config_path = env.tmp.path().join("zettel.toml");
    fs::write(
        &config_path,
        "id_precision = \"minutes\"\nextension = \"txt\"\nslug_separator = \"_\"\n",
    )
    .unwrap();

    let (stdout, stderr, success) = env.run(&[
        "--config",
        config_path.to_str().unwrap(),
        "new",
        "two words",
    ]);
    assert!(success, "stderr: {}", stderr);
    let name = stdout.trim();
    assert!(name.ends_with("_two_words.txt"), "name: {}", name);
    assert_eq!(name.find('_'), Some(12));
}

#[test]
fn test_bad_config_file() {
    let env = TestEnv::new();
    let config_path = env.tmp.path().join("zettel.toml");
    fs::write(&config_path, "slug_separator = \"/\"\n").unwrap();
    let (_, stderr, success) = env.run(&["--config", config_path.to_str().unwrap(), "list"]);
    assert!(!success);
    assert!(stderr.contains("slug_separator"));
}

#[test]
fn test_completion_and_version() {
    let env = TestEnv::new();
    let (stdout, _, success) = env.run(&["completion", "bash"]);
    assert!(success);
    assert!(stdout.contains("zettel"));
    for command in ["new", "open", "index", "reindex", "completion"] {
        assert!(stdout.contains(command), "completion is missing {}", command);
    }

    let (stdout, _, success) = env.run(&["--version"]);
    assert!(success);
    assert!(stdout.starts_with("zettel "));
}

#[test]
fn test_completion_skips_config_and_notes_dir() {
    let env = TestEnv::new();
    fs::remove_dir(env.notes()).unwrap();
    let config_path = env.tmp.path().join("zettel.toml");
    fs::write(&config_path, "not valid toml [[[\n").unwrap();

    let (stdout, stderr, success) =
        env.run(&["--config", config_path.to_str().unwrap(), "completion", "zsh"]);
    assert!(success, "stderr: {}", stderr);
    assert!(stdout.contains("zettel"));
    assert!(!env.notes().exists());

    let (_, _, success) = env.run(&["--config", config_path.to_str().unwrap(), "list"]);
    assert!(!success);
}
