use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_formflow_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("formflow")
}

#[test]
fn test_help_documents_the_invocation_surface() {
    let mut cmd = Command::new(get_formflow_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Browser-driven acceptance harness",
        ))
        .stdout(predicate::str::contains("<URL>"))
        .stdout(predicate::str::contains("--headless"))
        .stdout(predicate::str::contains("--out-dir"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_url_is_required() {
    let mut cmd = Command::new(get_formflow_bin());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn test_rejects_a_target_that_is_not_a_url() {
    // Config validation runs before any browser is launched, so this fails
    // fast even on machines without Chrome.
    let mut cmd = Command::new(get_formflow_bin());
    cmd.arg("not a url").arg("--headless");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid target URL"));
}

#[test]
fn test_rejects_unsupported_url_scheme() {
    let mut cmd = Command::new(get_formflow_bin());
    cmd.arg("ftp://host/form.html").arg("--headless");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported URL scheme"));
}

#[test]
fn test_out_dir_flag_parses() {
    let tmp = tempfile::tempdir().unwrap();

    // Invalid URL keeps the run from reaching Chrome; the flag itself must
    // still parse.
    let mut cmd = Command::new(get_formflow_bin());
    cmd.arg("not a url")
        .arg("--out-dir")
        .arg(tmp.path().join("evidence"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid target URL"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::new(get_formflow_bin());
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("formflow"));
}
