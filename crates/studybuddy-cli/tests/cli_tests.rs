//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NOTES: &str = "Marie Curie was born in Warsaw. She moved to Paris and studied at the \
                     University of Paris. Her research on Radioactivity earned the Nobel Prize \
                     in 1903.";

/// The binary run inside `dir`, isolated from the user's config and env.
fn studybuddy(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("studybuddy").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("STUDYBUDDY_OPENAI_KEY")
        .env_remove("STUDYBUDDY_OLLAMA_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    studybuddy(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("study"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("list-models"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn init_creates_config_once() {
    let dir = TempDir::new().unwrap();

    studybuddy(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created studybuddy.toml"));
    assert!(dir.path().join("studybuddy.toml").exists());

    studybuddy(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn extract_prints_file_text() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Notes.java"), "\n class Notes {}\n\n").unwrap();

    studybuddy(&dir)
        .args(["extract", "--file", "Notes.java"])
        .assert()
        .success()
        .stdout("class Notes {}\n");
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    studybuddy(&dir)
        .args(["extract", "--file", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: file not found"));
}

#[test]
fn extract_unsupported_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("grades.xlsx"), "x").unwrap();
    studybuddy(&dir)
        .args(["extract", "--file", "grades.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"));
}

#[test]
fn offline_paste_runs_full_flow() {
    let dir = TempDir::new().unwrap();
    let input = format!("1\n{NOTES}\n\nA\nb\nexit\n");

    studybuddy(&dir)
        .args(["study", "--offline", "--seed", "42"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== AI Study Buddy ==="))
        .stdout(predicate::str::contains("Quiz Started!"))
        .stdout(predicate::str::contains("Q1: Marie Curie"))
        .stdout(predicate::str::contains("Incorrect! Correct answer: A"))
        .stdout(predicate::str::contains("Score: 1/2 correct"))
        .stdout(predicate::str::contains("Knowledge Graph (Sample):"));
}

#[test]
fn default_command_is_study() {
    let dir = TempDir::new().unwrap();
    studybuddy(&dir)
        .arg("--offline")
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice!"))
        .stdout(predicate::str::contains("Quiz Started!").not());
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    studybuddy(&dir)
        .args(["study", "--offline", "--file", "absent.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File not found!"));
}

#[test]
fn unreachable_model_falls_back_to_placeholders() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), NOTES).unwrap();

    studybuddy(&dir)
        .args(["--file", "notes.txt", "--questions", "2", "--graph-format", "json"])
        .env("STUDYBUDDY_OLLAMA_URL", "http://127.0.0.1:9")
        .write_stdin("a\na\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error loading AI models"))
        .stdout(predicate::str::contains("D) N/A"))
        .stdout(predicate::str::contains("Score: 2/2 correct"))
        .stdout(predicate::str::contains("\"entity\": \"Marie Curie\""));
}

#[test]
fn list_models_for_openai_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("studybuddy.toml"),
        r#"
default_provider = "openai"

[providers.openai]
type = "openai"
api_key = "sk-test"
"#,
    )
    .unwrap();

    studybuddy(&dir)
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4.1-mini"))
        .stdout(predicate::str::contains("1000K"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "temperature = \"warm\"\n").unwrap();

    studybuddy(&dir)
        .args(["study", "--offline", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: failed to parse config"));
}
