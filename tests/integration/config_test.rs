//! Integration tests for configuration handling.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::helpers::{run_termcanvas, run_termcanvas_env};

/// Five live output blocks of 30 lines each (31 rows with the trailing
/// blank), tall enough that only the newest survives a tight line budget
/// intact.
fn write_tall_script(dir: &Path) -> String {
    let mut text = String::new();
    for _ in 0..30 {
        text.push_str("line\\n");
    }
    let block = format!("{{\"kind\": \"output\", \"text\": \"{text}\"}}");
    let script = format!(
        "{{\"blocks\": [{}]}}",
        vec![block; 5].join(", ")
    );
    let path = dir.join("tall.json");
    fs::write(&path, script).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn budgets_from_config_file_evict_scrollback() {
    let tmp = TempDir::new().unwrap();
    let script = write_tall_script(tmp.path());
    let config = tmp.path().join("config.toml");
    fs::write(
        &config,
        r#"
        [canvas]
        scrollback_max_lines = 10
        scrollback_max_frames = 100
        margin_style = "none"
        "#,
    )
    .unwrap();

    let (stdout, _stderr, exit_code) = run_termcanvas(&[
        &script,
        "--headless",
        "--config",
        config.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    // The three oldest blocks are deleted, the fourth is trimmed to the
    // 10-line budget (its resize flows through the pump on tick 2), and
    // the newest block alone fills the viewport.
    insta::assert_snapshot!(stdout, @r###"
    panes: 2
    live: 1
    total height: 41
    scroll offset: 17
    ticks: 2
    events: 1
    "###);
}

#[test]
fn cli_flags_override_the_config_file() {
    let tmp = TempDir::new().unwrap();
    let script = write_tall_script(tmp.path());
    let config = tmp.path().join("config.toml");
    fs::write(
        &config,
        r#"
        [canvas]
        scrollback_max_lines = 10
        margin_style = "none"
        "#,
    )
    .unwrap();

    let (stdout, _stderr, exit_code) = run_termcanvas(&[
        &script,
        "--headless",
        "--config",
        config.to_str().unwrap(),
        "--max-lines",
        "1000000",
    ]);

    assert_eq!(exit_code, 0);
    // Budget raised from the command line: nothing is evicted.
    assert!(stdout.contains("panes: 5"));
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("tiny.json");
    fs::write(
        &script,
        r#"{"blocks": [{"kind": "output", "text": "a\n"}, {"kind": "output", "text": "b\n"}]}"#,
    )
    .unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(&config, "scrollback_max_lines = \"lots\"").unwrap();

    let (stdout, stderr, exit_code) = run_termcanvas_env(
        &[
            script.to_str().unwrap(),
            "--headless",
            "--config",
            config.to_str().unwrap(),
        ],
        &[("RUST_LOG", "warn")],
    );

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("ignoring config"));
    assert!(stdout.contains("panes: 2"));
}
