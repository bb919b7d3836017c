use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("troll").unwrap()
}

fn small_valid_troll() -> &'static str {
    "troolooloololooll."
}

// olo llo lll: the cell never reaches 0, so the loop spins forever.
fn infinite_troll() -> &'static str {
    "troolollolllll."
}

#[test]
fn test_stdout_only_for_program_output() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("read")
        .arg(small_valid_troll())
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not())
        .stderr(predicate::str::contains("Execution aborted").not());
}

#[test]
fn test_stderr_only_for_abort_messages() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .env("TROLL_TIMEOUT_MS", "100")
        .arg("read")
        .arg(infinite_troll())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Execution aborted"))
        .stdout(predicate::str::contains("Execution aborted").not());
}

#[test]
fn test_step_limit_flag_aborts() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .arg("read")
        .arg("--max-steps")
        .arg("1000")
        .arg(infinite_troll())
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded"));
}
