use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const DATE: &str = "2026-10-18";

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "workshop-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn workshop(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_workshop"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--date", DATE])
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run cli")
}

fn saved(data_dir: &Path) -> serde_json::Value {
    let blob = std::fs::read_to_string(data_dir.join("workshop.save.json")).expect("read save");
    serde_json::from_str(&blob).expect("parse save")
}

#[test]
fn status_creates_the_save_file() {
    let dir = temp_path("status");
    let output = workshop(&dir, &["status"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Daily Workshop"));
    assert!(stdout.contains("1."));

    let save = saved(&dir);
    assert_eq!(save["day"], 1);
    assert_eq!(save["lastPlayedDate"], DATE);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn actions_spend_points_and_persist() {
    let dir = temp_path("act");
    assert!(workshop(&dir, &["status"]).status.success());
    let before = saved(&dir)["actionPoints"].as_u64().expect("points");

    let output = workshop(&dir, &["act", "gather_parts"]);
    assert!(output.status.success());
    let after = saved(&dir)["actionPoints"].as_u64().expect("points");
    assert_eq!(after + 1, before);

    let output = workshop(&dir, &["pick", "99"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no choice numbered 99"));

    let output = workshop(&dir, &["act", "build_tool", "--tool", "laser"]);
    assert!(!output.status.success());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn reset_needs_confirmation() {
    let dir = temp_path("reset");
    assert!(workshop(&dir, &["act", "gather_parts"]).status.success());

    let refused = workshop(&dir, &["reset"]);
    assert!(!refused.status.success());
    assert!(String::from_utf8_lossy(&refused.stderr).contains("--yes"));

    let confirmed = workshop(&dir, &["reset", "--yes"]);
    assert!(confirmed.status.success());
    assert!(String::from_utf8_lossy(&confirmed.stdout).contains("Workshop reset."));
    assert_eq!(saved(&dir)["day"], 1);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn simulate_reports_json_without_saving() {
    let dir = temp_path("simulate");
    let output = workshop(
        &dir,
        &["simulate", "--days", "5", "--strategy", "random", "--seed", "9", "--report", "json"],
    );
    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json summary");
    assert_eq!(summary["strategy"], "Random");
    assert_eq!(summary["start_date"], DATE);
    assert!(!dir.exists());
}
