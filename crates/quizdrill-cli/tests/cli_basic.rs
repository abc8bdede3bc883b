//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::io::Write;
use std::process::Command;

/// Run a CLI command and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "quizdrill-cli", "--"])
        .args(args)
        .env("QUIZDRILL_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Quizdrill CLI"));
}

#[test]
fn test_config_list_is_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("config list output is not JSON");
    assert!(parsed.get("session").is_some());
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_questions_validate_accepts_good_pack() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let pack = serde_json::json!([{
        "id": 1,
        "category": "test",
        "difficulty": "easy",
        "prompt": "pick A",
        "options": [
            {"key": "A", "text": "a"},
            {"key": "B", "text": "b"},
            {"key": "C", "text": "c"},
            {"key": "D", "text": "d"},
            {"key": "E", "text": "e"}
        ],
        "correct": "A"
    }]);
    write!(file, "{pack}").unwrap();

    let path = file.path().to_string_lossy().to_string();
    let (stdout, _, code) = run_cli(&["questions", "validate", &path]);
    assert_eq!(code, 0, "validate failed");
    assert!(stdout.contains("ok: 1 questions"));
}

#[test]
fn test_questions_validate_rejects_empty_pack() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[]").unwrap();

    let path = file.path().to_string_lossy().to_string();
    let (_, stderr, code) = run_cli(&["questions", "validate", &path]);
    assert_ne!(code, 0);
    assert!(stderr.contains("empty"));
}

#[test]
fn test_session_status_reports_phase() {
    let (stdout, _, code) = run_cli(&["session", "status"]);
    assert_eq!(code, 0, "session status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status output is not JSON");
    assert_eq!(parsed["type"], "StateSnapshot");
    assert!(parsed.get("phase").is_some());
}
