//! Smoke tests for the `drp` binary.

mod common;

use common::{fixture, json_line, run_cli_case, run_cli_case_with_env};

#[test]
fn preset_week_json() {
    let result = run_cli_case("preset_week_json", &["--json", "preset", "week", "--anchor", "2025-06-11"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_line(&result);
    assert_eq!(payload["command"], "preset");
    assert_eq!(payload["start"], "2025-06-09");
    assert_eq!(payload["end"], "2025-06-15");
    assert_eq!(payload["span_days"], 7);
}

#[test]
fn preset_custom_is_a_user_error() {
    let result = run_cli_case("preset_custom", &["--json", "preset", "custom"]);
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stderr.contains("custom"));
}

#[test]
fn shift_custom_preserves_span() {
    let result = run_cli_case(
        "shift_custom",
        &["--json", "shift", "custom", "2025-01-01", "2025-01-10"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_line(&result);
    assert_eq!(payload["start"], "2025-01-11");
    assert_eq!(payload["end"], "2025-01-20");
}

#[test]
fn shift_month_backwards_twice() {
    let result = run_cli_case(
        "shift_month",
        &["--json", "shift", "month", "20250315", "--direction", "prev", "--count", "2"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_line(&result);
    assert_eq!(payload["start"], "2025-01-01");
    assert_eq!(payload["end"], "2025-01-31");
}

#[test]
fn format_env_changes_rendering() {
    let result = run_cli_case_with_env(
        "format_env",
        &["--json", "preset", "today", "--anchor", "2025-06-11"],
        &[("DRP_FORMAT", "DD.MM.YYYY")],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert_eq!(json_line(&result)["start"], "11.06.2025");
}

#[test]
fn replay_reports_changes_as_json() {
    let script = fixture("range_confirm.jsonl").to_string_lossy().into_owned();
    let result = run_cli_case(
        "replay_range",
        &["--json", "replay", script.as_str(), "--today", "2025-06-11"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_line(&result);
    assert_eq!(payload["command"], "replay");
    assert_eq!(payload["mode"], "range");
    assert_eq!(payload["committed"][0], "2025-01-05");
    assert_eq!(payload["committed"][1], "2025-01-25");
    assert_eq!(payload["host"]["changes"][0][0], "custom");
}

#[test]
fn replay_writes_activity_log() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("activity.jsonl");
    let script = fixture("too_long.jsonl").to_string_lossy().into_owned();
    let log_arg = log.to_string_lossy().into_owned();
    let result = run_cli_case(
        "replay_log",
        &[
            "--json",
            "replay",
            script.as_str(),
            "--max-days",
            "30",
            "--log",
            log_arg.as_str(),
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let contents = std::fs::read_to_string(&log).expect("activity log");
    assert!(contents.contains("\"event\":\"commit_rejected\""));
    assert!(contents.contains("DRP-2002"));
}

#[test]
fn config_validate_rejects_bad_pattern() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[picker]\nformat = \"YYYY/MM\"\n").expect("write config");
    let path_arg = path.to_string_lossy().into_owned();
    let result = run_cli_case(
        "config_validate_bad",
        &["--json", "--config", path_arg.as_str(), "config", "validate"],
    );
    assert_eq!(result.status.code(), Some(1));
    let payload = json_line(&result);
    assert_eq!(payload["valid"], false);
    assert_eq!(payload["code"], "DRP-1101");
}

#[test]
fn config_path_reports_missing_default() {
    let result = run_cli_case("config_path", &["--json", "config", "path"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_line(&result);
    assert_eq!(payload["exists"], false);
    assert!(payload["path"].as_str().unwrap_or_default().ends_with("config.toml"));
}

#[test]
fn completions_generate_script() {
    let result = run_cli_case("completions_bash", &["completions", "bash"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stdout.contains("drp"));
}
