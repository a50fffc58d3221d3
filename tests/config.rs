use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;

mod common;

use common::isolate;

/// `bf` with its config home pointed at `home`, so the user's own bf.toml
/// never leaks into a test.
fn isolated(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    isolate(&mut cmd, home);
    cmd
}

fn write_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

fn write_config(home: &Path, content: &str) {
    fs::write(home.join("bf.toml"), content).unwrap();
    fs::create_dir_all(home.join(".config")).unwrap();
    fs::write(home.join(".config").join("bf.toml"), content).unwrap();
}

#[test]
fn env_cells_limits_the_tape() {
    let home = tempfile::tempdir().unwrap();
    let tf = write_tempfile(">");
    isolated(home.path())
        .env("BF_CELLS", "1")
        .arg(tf.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pointer out of bounds"));
}

#[test]
fn flag_overrides_env() {
    let home = tempfile::tempdir().unwrap();
    let tf = write_tempfile(">");
    isolated(home.path())
        .env("BF_CELLS", "1")
        .args(["--cells", "2"])
        .arg(tf.path())
        .assert()
        .success();
}

#[test]
fn env_cell_width_controls_wraparound() {
    let home = tempfile::tempdir().unwrap();
    let code = format!("{}[>+.<[-]]", "+".repeat(256));
    let tf = write_tempfile(&code);
    isolated(home.path())
        .env("BF_CELL_WIDTH", "2")
        .arg(tf.path())
        .assert()
        .success()
        .stdout(vec![1u8]);
}

#[test]
fn config_file_sets_tape_size() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), "[engine]\ncells = 1\n");
    let tf = write_tempfile(">");
    isolated(home.path())
        .arg(tf.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pointer out of bounds"));
}

#[test]
fn env_overrides_config_file() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), "[engine]\ncells = 1\n");
    let tf = write_tempfile(">");
    isolated(home.path())
        .env("BF_CELLS", "2")
        .arg(tf.path())
        .assert()
        .success();
}

#[test]
fn malformed_config_file_is_ignored() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), "[engine\ncells = ");
    let tf = write_tempfile(">+.");
    isolated(home.path())
        .arg(tf.path())
        .assert()
        .success()
        .stdout(vec![1u8])
        .stderr(predicate::str::contains("malformed config file"));
}

#[test]
fn caller_tape_variables_do_not_leak_into_isolated_runs() {
    let home = tempfile::tempdir().unwrap();
    let tf = write_tempfile(">+.");
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CELLS", "1").env("BF_CELL_WIDTH", "3");
    isolate(&mut cmd, home.path());
    cmd.arg(tf.path())
        .assert()
        .success()
        .stdout(vec![1u8]);
}
