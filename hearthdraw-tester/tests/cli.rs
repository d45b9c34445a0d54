use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "hearthdraw-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_hearthdraw-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("impact-replay"));
}

#[test]
fn cli_runs_smoke_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_hearthdraw-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,offline-regen",
            "--iterations",
            "2",
            "--seeds",
            "1,2",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Hearthdraw Session Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let results: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = results.as_array().expect("array of results");
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_rejects_bad_seed() {
    let exe = env!("CARGO_BIN_EXE_hearthdraw-tester");
    let output = Command::new(exe)
        .args(["--seeds", "not-a-seed", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}
