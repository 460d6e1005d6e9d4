#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "uilink-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_trace(tag: &str, text: &str) -> (PathBuf, PathBuf) {
    let dir = unique_temp_dir(tag);
    let path = dir.join("bus.trace");
    std::fs::write(&path, text).expect("trace should be writable");
    (dir, path)
}

const HELLO_TRACE: &str = "\
# hold   ch0     ch1     ch2     ch3
5ms      0x0041  0x0005  0x0000  0x0000
60ms     0x0041  0x0005  0x0000  0x0000
5ms      0x8042  0x8006  0x0000  0x0000
5ms      0x1805  0x8006  0x0000  0x0000
";

#[test]
fn replay_reports_commands_and_stats() {
    let (dir, trace) = write_trace("replay", HELLO_TRACE);

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .args(["--log-level", "error", "--format", "json", "replay"])
        .arg(&trace)
        .output()
        .expect("replay should run");

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())
        .expect("replay should emit json");

    assert!(payload["schema_id"]
        .as_str()
        .is_some_and(|id| id.ends_with("replay-report.schema.json")));
    let commands = payload["commands"].as_array().expect("commands array");
    let kinds: Vec<&str> = commands
        .iter()
        .filter_map(|c| c["command"].as_str())
        .collect();
    assert_eq!(kinds, vec!["print_char", "print_char", "boot"]);
    assert_eq!(commands[0]["col"], 5);
    assert_eq!(commands[1]["ascii"], 66);
    assert_eq!(payload["ticks"], 750);
    assert!(payload["stats"]["duplicates"].as_u64().unwrap_or(0) >= 1);
    assert!(payload["stats"]["stale_discards"].as_u64().unwrap_or(0) >= 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_tick_changes_duration_holds() {
    let (dir, trace) = write_trace("replay-tick", HELLO_TRACE);

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .args(["--log-level", "error", "--format", "json", "replay"])
        .arg(&trace)
        .env("UILINK_TICK", "1ms")
        .output()
        .expect("replay should run");

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim())
        .expect("replay should emit json");
    assert_eq!(payload["ticks"], 75);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_missing_trace_fails() {
    let dir = unique_temp_dir("replay-missing");

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .arg("replay")
        .arg(dir.join("absent.trace"))
        .output()
        .expect("replay should run");

    assert_eq!(output.status.code(), Some(1));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_bad_trace_is_data_invalid() {
    let (dir, trace) = write_trace("replay-bad", "5ms 0x0041 0x0005\n");

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .arg("replay")
        .arg(&trace)
        .output()
        .expect("replay should run");

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 1"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_rejects_zero_tick() {
    let (dir, trace) = write_trace("replay-zero", HELLO_TRACE);

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .arg("replay")
        .arg(&trace)
        .args(["--tick", "0us"])
        .output()
        .expect("replay should run");

    assert_eq!(output.status.code(), Some(64));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn run_plays_trace_to_the_end() {
    let (dir, trace) = write_trace("run", HELLO_TRACE);

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .args(["--log-level", "error", "--format", "raw", "run"])
        .arg(&trace)
        .args(["--fps", "200"])
        .output()
        .expect("run should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.first(), Some(&"print_char ascii=65 char='A' row=0 col=5"));
    assert!(lines.contains(&"boot"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn run_stops_after_count() {
    let (dir, trace) = write_trace("run-count", HELLO_TRACE);

    let output = Command::new(env!("CARGO_BIN_EXE_uilink"))
        .args(["--log-level", "error", "--format", "raw", "run"])
        .arg(&trace)
        .args(["--loop", "--count", "1"])
        .output()
        .expect("run should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}
