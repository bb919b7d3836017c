use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("troll").unwrap()
}

#[test]
fn generated_code_is_a_complete_program() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("write")
        .arg("Hi")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("tro").and(predicate::str::contains("ll.")));
}

#[test]
fn write_then_read_round_trips_text() {
    let out = cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("write")
        .arg("Hello World!")
        .output()
        .unwrap();
    assert!(out.status.success());
    let code = String::from_utf8(out.stdout).unwrap();

    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("read")
        .arg(code.trim())
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn write_reads_stdin_when_no_text_given() {
    let out = cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("write")
        .write_stdin("A")
        .output()
        .unwrap();
    assert!(out.status.success());
    let code = String::from_utf8(out.stdout).unwrap();

    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("read")
        .arg(code.trim())
        .assert()
        .success()
        .stdout("A\n");
}
