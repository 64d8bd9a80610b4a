#![cfg(feature = "cli")]

use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_oxidfu").to_string()
}

#[test]
fn cli_encode_then_list_chunks() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("stream.txt");
    let stream = dir.path().join("stream.bin");

    std::fs::write(
        &script,
        "# reference stream\nraw 55 66 77\nrep 42 100\narr 1 01 02 03\noff -8191 1024\n",
    )
    .unwrap();

    let st = Command::new(bin())
        .arg("encode")
        .arg(&script)
        .arg(&stream)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&stream).unwrap(),
        [
            0x20, 0x55, 0x66, 0x77, 0x35, 0x06, 0x42, 0x22, 0x00, 0x01, 0x02, 0x03, 0xF7, 0x3F,
            0x05, 0x80
        ]
    );

    let out = Command::new(bin())
        .args(["--json", "chunks"])
        .arg(&stream)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["chunks"].as_array().unwrap().len(), 4);
    assert_eq!(json["chunks"][3]["offset"], -8191);
    assert_eq!(json["chunks"][3]["size"], 1024);
}

#[test]
fn cli_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("demo.bin");
    std::fs::write(&out_path, b"keep").unwrap();

    let st = Command::new(bin())
        .args(["demo", "--output"])
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&out_path).unwrap(), b"keep");

    let st = Command::new(bin())
        .args(["--force", "demo", "--output"])
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&out_path).unwrap().len(), 38);
}

#[test]
fn cli_dump_reports_truncation() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cut.bin");
    std::fs::write(&input, [0x01, 0x2A, 0x20, 0x55]).unwrap();

    let out = Command::new(bin()).arg("dump").arg(&input).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.contains("REP [        1] byte 0x2a"));
    assert!(text.contains("<truncated: out of bounds at byte 3>"));

    let out = Command::new(bin())
        .args(["-q", "chunks"])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn cli_encode_rejects_oversized_stream() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("big.txt");
    let stream = dir.path().join("big.bin");
    std::fs::write(&script, "raw 00 11 22 33\n").unwrap();

    let st = Command::new(bin())
        .args(["encode", "--capacity", "4"])
        .arg(&script)
        .arg(&stream)
        .status()
        .unwrap();
    assert!(!st.success());
    assert!(!stream.exists());
}

#[test]
fn cli_encode_rejects_unallocatable_capacity() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("s.txt");
    let stream = dir.path().join("s.bin");
    std::fs::write(&script, "rep 00 4\n").unwrap();

    let out = Command::new(bin())
        .args(["encode", "--capacity"])
        .arg(usize::MAX.to_string())
        .arg(&script)
        .arg(&stream)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot allocate"));
    assert!(!stream.exists());
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("MAX_COUNT=268435456"));
}
