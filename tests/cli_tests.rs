//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

mod common;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{fixture_path, invalid_config_fixture, repcoach, valid_config_fixture};

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("personas"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("tone"))
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_short_version_flag() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repcoach"));
}

#[test]
fn test_unknown_command_fails() {
    let home = TempDir::new().unwrap();
    repcoach(home.path()).arg("diagnose").assert().failure();
}

// ─────────────────────────────────────────────────────────────────
// Persona Catalog Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_personas_list_shows_bundled_catalog() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["personas", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("doc_001"))
        .stdout(predicate::str::contains("Dr. Arvind Mehta"))
        .stdout(predicate::str::contains("doc_008"));
}

#[test]
fn test_personas_show() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["personas", "show", "doc_003"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dr. Anuja Nair"))
        .stdout(predicate::str::contains("\"available_time_secs\": 150"));
}

#[test]
fn test_personas_show_unknown_id() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["personas", "show", "doc_999"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("E300"))
        .stderr(predicate::str::contains("personas list"));
}

#[test]
fn test_persona_dir_replaces_bundled_set() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("personas");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("custom.toml"),
        std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/personas/doc_006.toml"),
        )
        .unwrap()
        .replace("doc_006", "custom_001"),
    )
    .unwrap();

    repcoach(home.path())
        .env("REPCOACH_PERSONA_DIR", &dir)
        .args(["personas", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom_001"))
        .stdout(predicate::str::contains("doc_001").not());
}

// ─────────────────────────────────────────────────────────────────
// Evaluate Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_evaluate_evidence_call() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .arg("evaluate")
        .arg(fixture_path("evidence_call.json"))
        .args(["--persona", "doc_001"])
        .args(["--must-say", "indication", "--must-not-say", "cure"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""scores":{"accuracy":85,"empathy":75,"compliance":100,"adaptability":65}"#,
        ))
        .stdout(predicate::str::contains(r#""persona_id":"doc_001""#))
        .stdout(predicate::str::contains(r#""compliance_violations":[]"#));
}

#[test]
fn test_evaluate_flags_forbidden_phrase() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .arg("evaluate")
        .arg(fixture_path("hype_call.json"))
        .args(["--persona", "doc_002", "--must-not-say", "revolutionary", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compliance\": 90"))
        .stdout(predicate::str::contains("Contains prohibited phrase: 'revolutionary'."));
}

#[test]
fn test_evaluate_unknown_persona() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .arg("evaluate")
        .arg(fixture_path("evidence_call.json"))
        .args(["--persona", "nobody"])
        .assert()
        .failure()
        .code(30);
}

#[test]
fn test_evaluate_missing_transcript() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["evaluate", "does-not-exist.json", "--persona", "doc_001"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}

// ─────────────────────────────────────────────────────────────────
// Tone Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_tone_replay_cuts_on_third_hype() {
    let home = TempDir::new().unwrap();
    let output = repcoach(home.path())
        .arg("tone")
        .arg(fixture_path("hype_call.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0]["turnIndex"], 0);
    assert_eq!(steps[0]["decision"]["state"]["mood"], "annoyed");
    assert_eq!(steps[2]["turnIndex"], 4);
    assert_eq!(steps[2]["decision"]["cutNow"], true);
    assert_eq!(steps[2]["decision"]["state"]["hypeCount"], 3);
}

#[test]
fn test_tone_quick_path_never_pauses() {
    let home = TempDir::new().unwrap();
    let output = repcoach(home.path())
        .args(["tone", "--quick"])
        .arg(fixture_path("hype_call.json"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert!(steps.iter().all(|s| s["decision"]["pauseReply"] == false));
    assert_eq!(steps[0]["decision"]["mood"], "Dismissive");
}

// ─────────────────────────────────────────────────────────────────
// Simulate Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_simulate_persists_session() {
    let home = TempDir::new().unwrap();
    let sessions = home.path().join("sessions");

    repcoach(home.path())
        .env("REPCOACH_TRANSCRIPT_DIR", &sessions)
        .arg("--config")
        .arg(valid_config_fixture())
        .arg("simulate")
        .arg(fixture_path("simulate_script.json"))
        .args(["--persona", "doc_002", "--session-id", "sim-1", "--must-say", "endpoint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"session_id\": \"sim-1\""))
        .stdout(predicate::str::contains("Which endpoint was that?"))
        .stdout(predicate::str::contains("Please clarify."))
        .stdout(predicate::str::contains("\"remaining_secs\": 60"));

    let stored = std::fs::read_to_string(sessions.join("sim-1.json")).unwrap();
    let record: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(record["persona_id"], "doc_002");
    assert_eq!(record["transcript"].as_array().unwrap().len(), 6);
}

#[test]
fn test_simulate_refuses_existing_session_id() {
    let home = TempDir::new().unwrap();
    let sessions = home.path().join("sessions");
    let simulate = || {
        let mut cmd = repcoach(home.path());
        cmd.env("REPCOACH_TRANSCRIPT_DIR", &sessions)
            .arg("simulate")
            .arg(fixture_path("simulate_script.json"))
            .args(["--persona", "doc_002", "--session-id", "sim-2"]);
        cmd
    };

    simulate().assert().success();
    let before = std::fs::read_to_string(sessions.join("sim-2.json")).unwrap();

    simulate()
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("E403"));
    let after = std::fs::read_to_string(sessions.join("sim-2.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_simulate_rejects_unsafe_session_id() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .env("REPCOACH_TRANSCRIPT_DIR", home.path().join("sessions"))
        .arg("simulate")
        .arg(fixture_path("simulate_script.json"))
        .args(["--persona", "doc_002", "--session-id", "../escape"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("E402"));
}

// ─────────────────────────────────────────────────────────────────
// Config Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_default() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[logging]"))
        .stdout(predicate::str::contains("turn_seconds = 30"))
        .stdout(predicate::str::contains("match_mode = \"substring\""));
}

#[test]
fn test_config_validate_valid() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["config", "validate", "--config"])
        .arg(valid_config_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid."));
}

#[test]
fn test_config_validate_invalid() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["config", "validate", "--config"])
        .arg(invalid_config_fixture())
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E102"));
}

#[test]
fn test_config_validate_missing_file() {
    let home = TempDir::new().unwrap();
    repcoach(home.path())
        .args(["config", "validate", "--config", "/nonexistent/repcoach.toml"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E100"));
}

#[test]
fn test_config_init_then_refuse_overwrite() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("repcoach.toml");

    repcoach(home.path())
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    repcoach(home.path())
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .code(10);

    // The written file is picked up from the working directory
    repcoach(home.path())
        .args(["config", "validate"])
        .assert()
        .success();
}
