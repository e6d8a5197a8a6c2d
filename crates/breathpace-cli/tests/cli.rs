//! CLI E2E tests against the built binary, with config in a temp directory.

use std::path::Path;
use std::process::Command;

/// Invoke a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_breathpace-cli"))
        .args(args)
        .env("BREATHPACE_CONFIG_DIR", config_dir)
        .env_remove("BREATHPACE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Invoke a CLI command and expect success.
fn run_cli_success(config_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(config_dir, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{}' to contain '{}'",
        haystack,
        needle
    );
}

#[test]
fn patterns_list_includes_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["patterns", "list"]);
    assert_contains(&out, "Box Breathing");
    assert_contains(&out, "4-7-8");
    assert_contains(&out, "Triangle Breathing");
    assert_contains(&out, "Cycle choices: 3, 5, 7, 10");
}

#[test]
fn patterns_show_lists_phases() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["patterns", "show", "478"]);
    assert_contains(&out, "Breathe In");
    assert_contains(&out, "Breathe Out");
    assert_contains(&out, "One cycle: 19s");
}

#[test]
fn unknown_pattern_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["breathe", "--pattern", "nope", "--fast"]);
    assert_ne!(code, 0);
    assert_contains(&stderr, "Unknown breathing pattern: nope");
}

#[test]
fn breathe_fast_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["breathe", "--pattern", "triangle", "--cycles", "2", "--fast"],
    );
    assert_contains(&out, "x 2 cycles, 00:24 total");
    assert_contains(&out, "Cycle 1/2 complete");
    assert_contains(&out, "Session finished: 2 cycles");
    assert_contains(&out, "Breathe Out");
}

#[test]
fn breathe_rejects_zero_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["breathe", "--cycles", "0", "--fast"]);
    assert_ne!(code, 0);
    assert_contains(&stderr, "total cycles must be at least 1");
}

#[test]
fn breathe_json_emits_one_object_per_update() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["breathe", "--pattern", "478", "--cycles", "1", "--fast", "--json"],
    );
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();
    // start plus 19 ticks
    assert_eq!(lines.len(), 20);
    let last = lines.last().unwrap();
    assert_eq!(last["snapshot"]["running"], false);
    assert_eq!(last["snapshot"]["current_phase"], "inhale");
    assert_eq!(last["events"][1]["type"], "SessionFinished");
}

#[test]
fn meditate_fast_completes() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["meditate", "--seconds", "3", "--fast"]);
    assert_contains(&out, "00:03");
    assert_contains(&out, "00:00");
    assert_contains(&out, "Session Complete!");
}

#[test]
fn meditate_with_sound_reports_cues() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["meditate", "--seconds", "2", "--sound", "rain", "--fast"],
    );
    assert_contains(&out, "♪ Playing Rain");
    assert_contains(&out, "♪ Ambient sound paused");
}

#[test]
fn meditate_rejects_unknown_sound() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["meditate", "--seconds", "2", "--sound", "traffic", "--fast"],
    );
    assert_ne!(code, 0);
    assert_contains(&stderr, "unknown ambient sound");
}

#[test]
fn config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        run_cli_success(dir.path(), &["config", "set", "breathing.cycles", "7"]).trim(),
        "ok"
    );
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "breathing.cycles"]).trim(),
        "7"
    );
    let listed = run_cli_success(dir.path(), &["config", "list"]);
    assert_contains(&listed, "cycles = 7");
}

#[test]
fn config_set_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "breathing.cycles", "0"]);
    assert_ne!(code, 0);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "breathing.cycles"]).trim(),
        "5"
    );
}

#[test]
fn completions_generate() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["completions", "bash"]);
    assert_contains(&out, "breathpace-cli");
}
