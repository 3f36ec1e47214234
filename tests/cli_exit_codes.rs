use std::process::{Command, Output};

fn tapers(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tapers"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to launch tapers")
}

#[test]
fn abort_mode_exits_with_range_status() {
    let out = tapers(&["--theta0", "30", "-l", "4", "-m", "9", "--on-error", "abort"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("range error"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn status_mode_returns_same_code() {
    let out = tapers(&["--theta0", "30", "-l", "4", "-m", "9"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("range error"), "stderr: {stderr}");
}

#[test]
fn cap_radius_beyond_sphere_is_rejected() {
    for mode in ["status", "abort"] {
        let out = tapers(&["--theta0", "200", "-l", "4", "-m", "0", "--on-error", mode]);
        assert_eq!(out.status.code(), Some(2), "mode={mode}");
    }
}

#[test]
fn successful_run_prints_summary() {
    let out = tapers(&["--theta0", "30", "-l", "6", "-m", "1", "--top", "3"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Shannon number"), "stdout: {stdout}");
    assert!(stdout.contains("... 3 more"), "stdout: {stdout}");
}

#[test]
fn json_output_parses() {
    let out = tapers(&["--theta0", "45", "-l", "5", "-m", "0", "--json"]);
    assert_eq!(out.status.code(), Some(0));
    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["tapers"].as_array().map(Vec::len), Some(6));
}
