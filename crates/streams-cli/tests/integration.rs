//! Integration tests for CLI commands.

use serde_json::json;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn write_document(dir: &TempDir, name: &str, document: &serde_json::Value) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(document).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

fn activity() -> serde_json::Value {
    json!({
        "objectType": "activity",
        "verb": "post",
        "published": "2012-01-01T10:00:00+01:00",
        "actor": {"objectType": "person", "displayName": "Jane"},
        "object": {"objectType": "note", "content": "hello"}
    })
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_streams"))
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

#[test]
fn test_types_command() {
    let (success, stdout, _) = run_cli(&["types"]);
    assert!(success);
    assert!(stdout.contains("TYPE"));
    assert!(stdout.contains("activity"));
    assert!(stdout.contains("link objects"));
}

#[test]
fn test_types_json_output() {
    let (success, stdout, _) = run_cli(&["types", "--json"]);
    assert!(success);
    let types: Vec<serde_json::Value> = serde_json::from_str(&stdout).expect("Invalid JSON");
    let activity = types
        .iter()
        .find(|t| t["objectType"] == "activity")
        .expect("activity listed");
    let rules = activity["rules"].as_array().unwrap();
    assert!(rules.contains(&json!("object")));
    assert!(rules.contains(&json!("displayName")));
}

#[test]
fn test_validate_command() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "activity.json", &activity());

    let (success, stdout, _) = run_cli(&["validate", &path]);
    assert!(success);
    assert!(stdout.contains("OK: activity (5 properties)"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    let mut doc = activity();
    doc["rating"] = json!(7.5);
    let path = write_document(&dir, "bad.json", &doc);

    let (success, _, stderr) = run_cli(&["validate", &path]);
    assert!(!success);
    assert!(stderr.contains("rating"));

    let (success, stdout, _) = run_cli(&["validate", &path, "--json"]);
    assert!(!success);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["valid"], json!(false));

    let (success, _, _) = run_cli(&["validate", &path, "--lenient"]);
    assert!(success);
}

#[test]
fn test_validate_with_type_override() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "position.json", &json!({"latitude": 120.0}));

    let (success, _, _) = run_cli(&["validate", &path]);
    assert!(success);
    let (success, _, stderr) = run_cli(&["validate", &path, "--type", "position"]);
    assert!(!success);
    assert!(stderr.contains("latitude"));
}

#[test]
fn test_render_normalizes_values() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "activity.json", &activity());

    let (success, stdout, _) = run_cli(&["render", &path]);
    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        r#"{"objectType":"activity","verb":"post","published":"2012-01-01T09:00:00Z","actor":{"objectType":"person","displayName":"Jane"},"object":{"objectType":"note","content":"hello"}}"#
    );

    let (success, stdout, _) = run_cli(&["render", &path, "--pretty"]);
    assert!(success);
    assert!(stdout.contains("\n  \"verb\": \"post\""));
}

#[test]
fn test_render_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_streams"))
        .arg("render")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"objectType":"person","display_name":"Jane"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim_end(),
        r#"{"objectType":"person","displayName":"Jane"}"#
    );
}

#[test]
fn test_render_rejects_non_object_input() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "array.json", &json!([1, 2]));

    let (success, _, stderr) = run_cli(&["render", &path]);
    assert!(!success);
    assert!(stderr.contains("expected an object"));
}
