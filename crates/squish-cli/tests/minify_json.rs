//! Integration tests for the `squish` binary and its `--json` contract.

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "squish-cli", "--bin", "squish", "--"]);
    cmd
}

#[test]
fn test_single_file_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("a.js");
    fs::write(&input, "var x = 1;\n").unwrap();

    let output = cargo_bin()
        .arg(&input)
        .output()
        .expect("failed to run squish");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "var x=1;");
}

#[test]
fn test_json_summary_contract() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("out");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("a.js"), "function f(first){return first;}\n").unwrap();
    fs::write(src.join("sub/b.js"), "var y = 2;\n").unwrap();
    fs::write(src.join("notes.txt"), "not a script\n").unwrap();

    let output = cargo_bin()
        .args(["--json", "--munge", "--output"])
        .arg(&out)
        .arg(&src)
        .output()
        .expect("failed to run squish");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    assert_eq!(json["ok"].as_bool(), Some(true));
    assert_eq!(json["schema_version"].as_u64(), Some(1));

    let files = json["files"].as_array().expect("files array");
    assert_eq!(files.len(), 2, "only .js files are processed");
    for file in files {
        assert_eq!(file["ok"].as_bool(), Some(true));
        assert!(file["bytes_out"].as_u64().unwrap() > 0);
        assert!(file["bytes_out"].as_u64() <= file["bytes_in"].as_u64());
    }

    // Subdirectory structure is mirrored into the output directory.
    assert_eq!(
        fs::read_to_string(out.join("a.js")).unwrap(),
        "function f(a){return a};"
    );
    assert_eq!(fs::read_to_string(out.join("sub/b.js")).unwrap(), "var y=2;");
    assert!(!out.join("notes.txt").exists());
}

#[test]
fn test_pattern_and_munge_map_outputs() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("app.js");
    let planned = dir.path().join("app.js.out");
    fs::write(&input, "function f(first,second){return first+second;}\n").unwrap();

    let output = cargo_bin()
        .args(["--munge", "--munge-map", "--pattern", ".js.out:-min.js", "--output"])
        .arg(&planned)
        .arg(&input)
        .output()
        .expect("failed to run squish");

    assert!(output.status.success());
    let minified = dir.path().join("app-min.js");
    assert_eq!(
        fs::read_to_string(&minified).unwrap(),
        "function f(c,d){return c+d};"
    );
    let map = fs::read_to_string(dir.path().join("app-min.js.map")).unwrap();
    assert!(map.contains("c: first"));
    assert!(map.contains("d: second"));
}

#[test]
fn test_syntax_error_fails_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.js");
    let out = dir.path().join("bad.min.js");
    fs::write(&input, "var s = 'unterminated\n").unwrap();

    let output = cargo_bin()
        .args(["--output"])
        .arg(&out)
        .arg(&input)
        .output()
        .expect("failed to run squish");

    assert!(!output.status.success());
    assert!(!out.exists(), "no output file on fatal error");
}

#[test]
fn test_json_requires_output_target() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("a.js");
    fs::write(&input, "var x = 1;\n").unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg(&input)
        .output()
        .expect("failed to run squish");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--json requires --output"));
}
