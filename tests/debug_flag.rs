use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn debug_flag_prints_step_table_and_suppresses_output() {
    Command::cargo_bin("troll")
        .unwrap()
        .timeout(Duration::from_secs(2))
        .arg("read")
        .arg("--debug")
        .arg("troololooll.")
        .assert()
        .success()
        .stdout(predicate::str::contains("STEP | IP"))
        .stdout(predicate::str::contains("suppressed in debug"));
}
