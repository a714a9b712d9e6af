use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "floreria-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_floreria-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("gallery-flow"));
}

#[test]
fn cli_runs_all_scenarios_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_floreria-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "all",
            "--iterations",
            "2",
            "--seeds",
            "1,0x2a",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Floreria Catalog Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let runs = report.as_array().expect("array");
    assert!(!runs.is_empty());
    assert!(runs.iter().all(|r| r["passed"] == true));
}

#[test]
fn cli_rejects_bad_seed() {
    let exe = env!("CARGO_BIN_EXE_floreria-tester");
    let output = Command::new(exe)
        .args(["--seeds", "tulipan"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid seed"));
}
