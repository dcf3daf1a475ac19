// cli_test.rs - Exit codes and console output of the seqconvert binary

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn seqconvert(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seqconvert"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_usage_without_arguments() {
    let output = seqconvert(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Use: seqconvert"));
    assert!(stderr.contains("Valid types:"));
}

#[test]
fn test_usage_with_three_positionals() {
    let output = seqconvert(&["in.gb", "genbank", "out.fa"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Use: seqconvert"));
}

#[test]
fn test_version() {
    let output = seqconvert(&["-v"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn test_unknown_type_reports_error() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.embl");
    let input = fixture("has_plasmids.gb");
    let output = seqconvert(&[
        input.to_str().unwrap(),
        "genbank",
        out.to_str().unwrap(),
        "embl",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("❌ ERROR"));
    assert!(stderr.contains("embl"));
    assert!(!out.exists());
}

#[test]
fn test_missing_input_reports_error() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.fasta");
    let missing = dir.path().join("missing.gb");
    let output = seqconvert(&[
        missing.to_str().unwrap(),
        "genbank",
        out.to_str().unwrap(),
        "fasta",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("❌ ERROR"));
}

#[test]
fn test_query_syntax_error_reports_error() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.json");
    let input = fixture("has_plasmids.gb");
    let output = seqconvert(&[
        "-q",
        "[?",
        input.to_str().unwrap(),
        "genbank",
        out.to_str().unwrap(),
        "json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("❌ ERROR"));
    assert!(!out.exists());
}

#[test]
fn test_conversion_succeeds() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.fasta");
    let input = fixture("has_plasmids.gb");
    let output = seqconvert(&[
        input.to_str().unwrap(),
        "gb",
        out.to_str().unwrap(),
        "fasta",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(">NC_TEST1.1 "));
}
