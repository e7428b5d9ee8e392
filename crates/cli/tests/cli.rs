//! Binary-level smoke tests for the gantry CLI.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn hooks_lists_builtin_app() {
    let mut cmd = Command::cargo_bin("gantry").unwrap();
    cmd.arg("hooks")
        .assert()
        .success()
        .stdout(predicate::str::contains("pension"))
        .stdout(predicate::str::contains("parse_deductions"))
        .stdout(predicate::str::contains("DeductionElection"));
}

#[test]
fn hooks_filters_by_app() {
    let mut cmd = Command::cargo_bin("gantry").unwrap();
    cmd.args(["hooks", "--app", "pension"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export_file_name"));
}

#[test]
fn hooks_rejects_unknown_app() {
    let mut cmd = Command::cargo_bin("gantry").unwrap();
    cmd.args(["hooks", "--app", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown app"));
}

#[test]
fn help_names_the_subcommands() {
    let mut cmd = Command::cargo_bin("gantry").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("hooks"));
}
