//! # octoposh CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `octoposh` binary: standard flags, the `help`
//! subcommand, and rejection of unknown commands.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    octoposh_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_commands() {
    octoposh_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("machine"))
        .stdout(predicate::str::contains("environment"))
        .stdout(predicate::str::contains("styles"))
        .stdout(predicate::str::contains("connection"));
}

#[test]
fn test_help_subcommand() {
    octoposh_cmd()
        .args(["help", "machine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--resource-only"));
}

#[test]
fn test_unknown_subcommand_fails() {
    octoposh_cmd()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
