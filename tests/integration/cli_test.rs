//! Integration tests for the CLI surface.

use std::fs;

use tempfile::TempDir;

use crate::helpers::run_termcanvas;

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_exits_0_and_shows_usage() {
    let (stdout, _stderr, exit_code) = run_termcanvas(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Virtualized scroll canvas"));
    assert!(stdout.contains("--max-lines"));
    assert!(stdout.contains("--max-frames"));
    assert!(stdout.contains("--headless"));
}

#[test]
fn version_prints_the_crate_name() {
    let (stdout, _stderr, exit_code) = run_termcanvas(&["--version"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("termcanvas"));
}

// ============================================================================
// Headless Runs
// ============================================================================

#[test]
fn headless_sample_session_runs() {
    let tmp = TempDir::new().unwrap();
    let missing_config = tmp.path().join("none.toml");

    let (stdout, _stderr, exit_code) = run_termcanvas(&[
        "--headless",
        "--config",
        missing_config.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("panes: 12"));
    assert!(stdout.contains("live:"));
    assert!(stdout.contains("scroll offset:"));
}

#[test]
fn snapshot_headless_summary_for_a_small_script() {
    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("session.json");
    fs::write(
        &script,
        r#"{
            "blocks": [
                {"kind": "output", "text": "a\nb\n"},
                {"kind": "frame", "title": "t", "text": "x"}
            ]
        }"#,
    )
    .unwrap();
    let missing_config = tmp.path().join("none.toml");

    let (stdout, _stderr, exit_code) = run_termcanvas(&[
        script.to_str().unwrap(),
        "--headless",
        "--config",
        missing_config.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    // Two panes (3px live output + 1px frame) joined by the default 12px
    // margin fit a 24-row viewport: one refresh tick, nothing stashed.
    insta::assert_snapshot!(stdout, @r###"
    panes: 2
    live: 2
    total height: 16
    scroll offset: 0
    ticks: 1
    events: 0
    "###);
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn missing_script_file_reports_an_error() {
    let (_stdout, stderr, exit_code) =
        run_termcanvas(&["/nonexistent/session.json", "--headless"]);

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("failed to read script"));
}

#[test]
fn malformed_script_reports_an_error() {
    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("broken.json");
    fs::write(&script, "{\"blocks\": 3}").unwrap();

    let (_stdout, stderr, exit_code) =
        run_termcanvas(&[script.to_str().unwrap(), "--headless"]);

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("invalid session script"));
}
