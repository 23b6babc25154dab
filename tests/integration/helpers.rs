//! Shared helpers for integration tests.

use std::process::Command;

/// Run the termcanvas CLI and capture output.
pub fn run_termcanvas(args: &[&str]) -> (String, String, i32) {
    run_termcanvas_env(args, &[])
}

/// Run the termcanvas CLI with extra environment variables.
pub fn run_termcanvas_env(args: &[&str], env: &[(&str, &str)]) -> (String, String, i32) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_termcanvas"));
    cmd.args(args).env("NO_COLOR", "1");
    for (key, value) in env {
        cmd.env(key, value);
    }
    let output = cmd.output().expect("Failed to execute termcanvas");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
