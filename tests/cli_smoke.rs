use assert_cmd::Command;

#[test]
fn help_lists_the_operation_surface() {
    let mut cmd = Command::cargo_bin("docuport").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("containers"))
        .stdout(predicates::str::contains("staple"))
        .stdout(predicates::str::contains("update"));
}

#[test]
fn missing_server_is_a_usage_error_not_a_crash() {
    let mut cmd = Command::cargo_bin("docuport").unwrap();
    // No config file, no flags: the command must fail cleanly before any
    // network activity.
    cmd.env_remove("DOCUPORT_TOKEN")
        .env_remove("DOCUPORT_PASSWORD")
        .env("XDG_CONFIG_HOME", tempfile::tempdir().unwrap().path())
        .arg("count")
        .arg("Invoices")
        .assert()
        .failure()
        .stderr(predicates::str::contains("server URL"));
}

#[test]
fn unreachable_server_fails_cleanly() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("docuport").unwrap();
    // Port 1 refuses the connection; the transport error must surface on
    // stderr with a nonzero exit, never a panic.
    cmd.env("XDG_CONFIG_HOME", temp.path())
        .arg("--server")
        .arg("http://127.0.0.1:1")
        .arg("--token")
        .arg("t")
        .arg("containers")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Error:"));
}
