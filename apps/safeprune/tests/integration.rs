//! End-to-end tests of the `safeprune` binary
//!
//! These only exercise paths that never reach the remote host: argument
//! handling, config layering and local backup restore.

use std::path::Path;
use std::process::{Command, Output};

const HERMETIC_CONFIG: &str = r#"
[backup]
locations = ["backups", "backup"]
use_vcs_objects = false

[cleanup]
candidates = []
"#;

fn safeprune_command(work: &Path, config_text: &str) -> Command {
    let config = work.join("safeprune.toml");
    std::fs::write(&config, config_text).unwrap();

    let mut command = Command::new(env!("CARGO_BIN_EXE_safeprune"));
    command
        .arg("--config")
        .arg(&config)
        .arg("--work-dir")
        .arg(work)
        .env_remove("RUST_LOG")
        .env_remove("SAFEPRUNE_ORG")
        .env_remove("SAFEPRUNE_WORK_DIR")
        .env_remove("SAFEPRUNE_SEARCH_TIMEOUT")
        .env_remove("SAFEPRUNE_OUTPUT")
        .env_remove("SAFEPRUNE_COLOR");
    command
}

fn safeprune(work: &Path, args: &[&str]) -> Output {
    safeprune_command(work, HERMETIC_CONFIG)
        .args(["--color", "never"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn help_lists_every_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_safeprune"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in [
        "verify",
        "restore",
        "publish",
        "recover",
        "contents",
        "check-health",
    ] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn verify_without_files_or_candidates_fails() {
    let temp = tempfile::tempdir().unwrap();
    let output = safeprune(temp.path(), &["verify"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no files specified"), "stderr:\n{stderr}");
    assert!(stderr.contains("Code: ops.no_files"), "stderr:\n{stderr}");
    assert!(!temp.path().join("cleanup_verification_log.json").exists());
}

#[test]
fn restore_copies_from_first_backup_that_has_the_file() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join("backup")).unwrap();
    std::fs::write(temp.path().join("backup/notes.txt"), "from backup").unwrap();

    let output = safeprune(temp.path(), &["restore", "notes.txt"]);

    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(temp.path().join("notes.txt")).unwrap(),
        "from backup"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Restored notes.txt from backup/"), "stdout:\n{stdout}");
}

#[test]
fn restore_with_no_backup_reports_json_and_exits_zero() {
    let temp = tempfile::tempdir().unwrap();
    let output = safeprune(temp.path(), &["--json", "restore", "ghost.txt"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "Restore");
    assert_eq!(value["data"]["file"], "ghost.txt");
    assert_eq!(value["data"]["restored"], false);
    assert!(!temp.path().join("ghost.txt").exists());
}

#[test]
fn restore_rejects_paths_outside_the_working_directory() {
    let temp = tempfile::tempdir().unwrap();
    let output = safeprune(temp.path(), &["restore", "../outside.txt"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Code: ops.invalid_file_name"), "stderr:\n{stderr}");
}

#[test]
fn missing_work_dir_is_an_argument_error() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("nope");

    let output = Command::new(env!("CARGO_BIN_EXE_safeprune"))
        .arg("--work-dir")
        .arg(&missing)
        .args(["restore", "a.txt"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid arguments"));
}

#[test]
fn blank_org_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let output = safeprune(temp.path(), &["--org", " ", "restore", "a.txt"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[test]
fn configured_json_output_needs_no_flag() {
    let temp = tempfile::tempdir().unwrap();
    let config = format!("[general]\ndefault_output = \"json\"\n{HERMETIC_CONFIG}");
    let output = safeprune_command(temp.path(), &config)
        .args(["restore", "ghost.txt"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "Restore");
    assert_eq!(value["data"]["restored"], false);
}

#[test]
fn output_environment_variable_selects_json() {
    let temp = tempfile::tempdir().unwrap();
    let output = safeprune_command(temp.path(), HERMETIC_CONFIG)
        .env("SAFEPRUNE_OUTPUT", "json")
        .args(["restore", "ghost.txt"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["data"]["file"], "ghost.txt");
}

#[test]
fn plain_output_keeps_the_text_layout() {
    let temp = tempfile::tempdir().unwrap();
    let config = format!("[general]\ndefault_output = \"plain\"\n{HERMETIC_CONFIG}");
    let output = safeprune_command(temp.path(), &config)
        .args(["restore", "ghost.txt"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No backup of ghost.txt found"), "stdout:\n{stdout}");
    assert!(!stdout.contains('\u{1b}'), "stdout:\n{stdout}");
}
