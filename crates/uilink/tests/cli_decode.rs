#![cfg(feature = "cli")]

use std::process::Command;

fn uilink() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_uilink"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn decode_print_char_as_json() {
    let output = uilink()
        .args(["--format", "json", "decode", "0x0041", "0x0005"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("command-decoded.schema.json"));

    let payload: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("decode should emit json");
    assert_eq!(payload["command"], "print_char");
    assert_eq!(payload["ascii"], 65);
    assert_eq!(payload["row"], 0);
    assert_eq!(payload["col"], 5);
}

#[test]
fn decode_move_sprite_pretty() {
    let output = uilink()
        .args([
            "--format", "pretty", "decode", "0x2090", "0x3264", "0x2190", "0x1E14",
        ])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "move_sprite sprite=1/2 at (100,50) sprite=3/2 at (20,30)"
    );
}

#[test]
fn decode_accepts_binary_words() {
    let output = uilink()
        .args(["--format", "raw", "decode", "0b0_0011_000_0000_0000"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "boot");
}

#[test]
fn incomplete_command_is_data_invalid() {
    let output = uilink()
        .args(["decode", "0x0041"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("decode failed"));
}

#[test]
fn pairing_mismatch_is_data_invalid() {
    let output = uilink()
        .args(["decode", "0x0041", "0x8005"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn malformed_word_is_data_invalid() {
    let output = uilink()
        .args(["decode", "0xZZZZ"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn version_prints_package_version() {
    let output = uilink().arg("version").output().expect("version should run");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("uilink {}", env!("CARGO_PKG_VERSION"))
    );
}
