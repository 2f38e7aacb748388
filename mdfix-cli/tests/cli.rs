//! End-to-end tests for the mdfix binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn mdfix() -> Command {
    Command::cargo_bin("mdfix").unwrap()
}

fn write(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs_err::write(&path, contents).unwrap();
    path
}

fn read(path: &std::path::Path) -> String {
    fs_err::read_to_string(path).unwrap()
}

#[test]
fn no_arguments_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    mdfix()
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nothing to do"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    mdfix().arg("--no-such-flag").assert().code(2);
}

#[test]
fn fixes_a_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.md", b"#Title\n+ one\n* two\n");

    mdfix()
        .current_dir(dir.path())
        .arg("a.md")
        .assert()
        .success()
        .stdout(predicate::str::contains("changed"));

    assert_eq!(read(&path), "# Title\n\n- one\n- two\n");
}

#[test]
fn all_flag_walks_the_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.md", b"#Title\n");

    mdfix()
        .current_dir(dir.path())
        .arg("--all")
        .assert()
        .success();

    assert_eq!(read(&path), "# Title\n");
}

#[test]
fn dry_run_reports_but_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.md", b"#Title\n");

    mdfix()
        .current_dir(dir.path())
        .args(["--dry-run", "a.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would change"));

    assert_eq!(read(&path), "#Title\n");
}

#[test]
fn diff_flag_prints_a_unified_diff() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "a.md", b"#Title\n");

    mdfix()
        .current_dir(dir.path())
        .args(["--dry-run", "--diff", "a.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-#Title"))
        .stdout(predicate::str::contains("+# Title"));
}

#[test]
fn unreadable_file_exits_one_but_fixes_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "bad.md", b"\xff\xfe\n");
    let good = write(&dir, "good.md", b"#Title\n");

    mdfix()
        .current_dir(dir.path())
        .arg(".")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed"));

    assert_eq!(read(&good), "# Title\n");
}

#[test]
fn json_output_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "a.md", b"#Title\n");

    let assert = mdfix()
        .current_dir(dir.path())
        .args(["--format", "json", "--dry-run", "a.md"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["summary"]["changed"], 1);
    assert_eq!(json["files"][0]["status"], "changed");
}

#[test]
fn quiet_suppresses_the_report() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "a.md", b"#Title\n");

    mdfix()
        .current_dir(dir.path())
        .args(["--quiet", "a.md"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn config_file_sets_the_style() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "mdfix.toml", b"[style]\nbullet = \"asterisk\"\n");
    let path = write(&dir, "a.md", b"- one\n- two\n");

    mdfix()
        .current_dir(dir.path())
        .arg("a.md")
        .assert()
        .success();

    assert_eq!(read(&path), "* one\n* two\n");
}

#[test]
fn cli_style_flag_beats_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "mdfix.toml", b"[style]\nbullet = \"asterisk\"\n");
    let path = write(&dir, "a.md", b"* one\n+ two\n");

    mdfix()
        .current_dir(dir.path())
        .args(["--bullet", "dash", "a.md"])
        .assert()
        .success();

    assert_eq!(read(&path), "- one\n- two\n");
}

#[test]
fn second_run_is_a_no_op_with_exit_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "a.md", b"#One\n3. x\n5. y\n");

    mdfix().current_dir(dir.path()).arg("a.md").assert().success();
    let fixed = read(&path);

    mdfix()
        .current_dir(dir.path())
        .arg("a.md")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unchanged"));
    assert_eq!(read(&path), fixed);
}
