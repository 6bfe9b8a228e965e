use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the cgad-check binary.
#[allow(deprecated)]
fn cgad_cmd() -> Command {
    Command::cargo_bin("cgad-check").unwrap()
}

#[test]
fn help_works() {
    cgad_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--model-path"))
        .stdout(predicate::str::contains("--state-json"));
}

#[test]
fn missing_required_arguments_is_a_usage_error() {
    cgad_cmd()
        .arg("--model-path")
        .arg("model.cas.yaml")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--state-json"));
}
