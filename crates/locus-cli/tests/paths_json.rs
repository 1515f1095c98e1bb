//! Integration tests for `locus paths`, `locus core` and `locus version`.

use serial_test::serial;
use std::fs;
use std::process::Command;

fn locus() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_locus"));
    cmd.env_remove("NODE_PATH").env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to run locus");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

fn strings(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_posix_module_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("locus.json"),
        r#"{"moduleDirectories": ["/root/path/to/node_modules", "node_modules"]}"#,
    )
    .unwrap();

    let json = json_stdout(
        locus()
            .arg("--json")
            .arg("--cwd")
            .arg(dir.path())
            .args(["paths", "/temp/project", "--style", "posix", "--config", "locus.json"]),
    );
    assert_eq!(json["style"], "posix");
    assert_eq!(
        strings(&json["paths"]),
        vec![
            "/root/path/to/node_modules",
            "/temp/project/node_modules",
            "/temp/node_modules",
            "/node_modules",
        ]
    );
}

#[test]
fn test_windows_module_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("locus.json"),
        r#"{"moduleDirectories": ["C:\\path\\to\\node_modules", "node_modules"]}"#,
    )
    .unwrap();

    let json = json_stdout(
        locus()
            .arg("--json")
            .arg("--cwd")
            .arg(dir.path())
            .args(["paths", r"D:\project", "--style", "windows", "--config", "locus.json"]),
    );
    assert_eq!(json["style"], "windows");
    let paths = strings(&json["paths"]);
    for expected in [
        r"C:\path\to\node_modules",
        r"D:\project\node_modules",
        r"D:\node_modules",
    ] {
        assert!(paths.iter().any(|p| p == expected), "missing {expected}: {paths:?}");
    }
}

#[test]
fn test_core_command() {
    let json = json_stdout(locus().args(["--json", "core", "assert"]));
    assert_eq!(json["core"], true);

    let json = json_stdout(locus().args(["--json", "core", "assert", "--no-core-modules"]));
    assert_eq!(json["core"], false);

    let json = json_stdout(locus().args(["--json", "core", "not-a-core-module"]));
    assert_eq!(json["core"], false);
}

#[test]
fn test_version_command() {
    let output = locus().arg("version").output().expect("Failed to run locus");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("locus "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
#[serial]
fn test_verbose_logs_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.js"), "").unwrap();
    fs::write(dir.path().join("b.js"), "").unwrap();

    let output = locus()
        .arg("--json")
        .arg("-vv")
        .arg("--cwd")
        .arg(dir.path())
        .args(["resolve", "./b", "--from", "a.js"])
        .output()
        .expect("Failed to run locus");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(json["ok"], true);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("resolve finished"), "stderr: {stderr}");
}
