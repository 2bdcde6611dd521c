use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use uuid::Uuid;

fn unique_workspace(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&path).expect("workspace should be creatable");
    path
}

fn run_notebook(cwd: &Path, args: &[&str], input: &str) -> Output {
    run_notebook_with_env(cwd, args, &[], input)
}

fn run_notebook_with_env(
    cwd: &Path,
    args: &[&str],
    vars: &[(&str, &Path)],
    input: &str,
) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_notebook"))
        .args(args)
        .current_dir(cwd)
        .envs(vars.iter().copied())
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("notebook should start");
    // The child may exit before reading stdin (e.g. on a startup error);
    // a broken pipe here is not a test failure.
    if let Err(err) = child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input.as_bytes())
    {
        assert_eq!(
            err.kind(),
            std::io::ErrorKind::BrokenPipe,
            "input should be writable: {err}"
        );
    }
    child.wait_with_output().expect("notebook should finish")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success but failed.\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read_notes(path: &Path) -> Vec<Value> {
    let raw = std::fs::read_to_string(path).expect("notes file should exist");
    let parsed: Value = serde_json::from_str(&raw).expect("notes file should be JSON");
    parsed.as_array().expect("notes file should hold a list").clone()
}

#[test]
fn default_file_is_notes_json_in_working_directory() {
    let root = unique_workspace("notebook-cli-default");
    let output = run_notebook(&root, &[], "1\nGroceries\nmilk\nhome, errands\n0\n");
    assert_success(&output);
    assert!(stdout(&output).contains("Note added successfully!"));

    let notes = read_notes(&root.join("notes.json"));
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Groceries");
    assert_eq!(notes[0]["content"], "milk");
    assert_eq!(notes[0]["tags"], serde_json::json!(["home", "errands"]));
    assert_eq!(notes[0]["date"].as_str().map(str::len), Some(16));
}

#[test]
fn environment_does_not_move_the_notes_file() {
    let root = unique_workspace("notebook-cli-env");
    let elsewhere = root.join("elsewhere.json");
    let config = root.join("elsewhere.toml");
    std::fs::write(&config, "notes_file = \"from_config.json\"\n")
        .expect("config should be writable");
    let output = run_notebook_with_env(
        &root,
        &[],
        &[("NOTEBOOK_FILE", &elsewhere), ("NOTEBOOK_CONFIG", &config)],
        "1\nStays put\n\n\n0\n",
    );
    assert_success(&output);

    assert_eq!(read_notes(&root.join("notes.json")).len(), 1);
    assert!(!elsewhere.exists());
    assert!(!root.join("from_config.json").exists());
}

#[test]
fn help_lists_no_environment_fallbacks() {
    let root = unique_workspace("notebook-cli-help");
    let output = run_notebook(&root, &["--help"], "");
    assert_success(&output);
    let help = stdout(&output);
    assert!(help.contains("--file"));
    assert!(!help.contains("[env:"));
}

#[test]
fn full_session_add_sort_search_delete() {
    let root = unique_workspace("notebook-cli-session");
    let file = root.join("book.json");
    let file_arg = file.to_str().expect("utf8 path");

    let input = "1\nbanana\nyellow fruit\nfood\n\
                 1\nApple\nProject Plan\nwork\n\
                 7\n1\n\
                 2\n\
                 3\nproj\nd\n1\ny\n\
                 0\n";
    let output = run_notebook(&root, &["--file", file_arg], input);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Notes sorted: By title (A-Z)."));
    assert!(text.contains("[1] Apple"));
    assert!(text.contains("Found 1 note(s):"));
    assert!(text.contains("Note deleted."));
    assert!(text.trim_end().ends_with("Goodbye!"));

    let notes = read_notes(&file);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "banana");
}

#[test]
fn corrupt_file_starts_empty_and_is_rewritten() {
    let root = unique_workspace("notebook-cli-corrupt");
    std::fs::write(root.join("notes.json"), "{ not json").expect("fixture should be writable");

    let output = run_notebook(&root, &[], "2\n0\n");
    assert_success(&output);
    assert!(stdout(&output).contains("No notes yet."));
    assert!(read_notes(&root.join("notes.json")).is_empty());
}

#[test]
fn password_gate_refuses_after_three_attempts() {
    let root = unique_workspace("notebook-cli-gate");
    let config = root.join("notebook.toml");
    std::fs::write(&config, "[access]\npassword = \"letmein\"\n").expect("config writable");
    let config_arg = config.to_str().expect("utf8 path");

    let output = run_notebook(&root, &["--config", config_arg], "a\nb\nc\n");
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Too many failed attempts. Exiting."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: access denied"));
    assert!(!root.join("notes.json").exists());

    let output = run_notebook(&root, &["--config", config_arg], "letmein\n0\n");
    assert_success(&output);
    assert!(root.join("notes.json").exists());
}

#[test]
fn unreadable_config_fails_fast() {
    let root = unique_workspace("notebook-cli-bad-config");
    let output = run_notebook(&root, &["--config", "missing.toml"], "0\n");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read config"));
}
