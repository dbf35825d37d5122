use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

use freecellar::{format_deck, Card, Layout};

fn solve_cmd() -> Command {
    Command::cargo_bin("solve").expect("binary exists")
}

/// King of hearts loose on column 0, hearts foundation up to the queen.
fn trivial_deck() -> String {
    let mut columns: [Vec<Card>; 8] = std::array::from_fn(|_| Vec::new());
    columns[0].push(Card::from_code("kh").expect("card"));
    let layout = Layout::from_parts(columns, Vec::new(), [13, 13, 12, 13]).expect("layout");
    format_deck(&layout)
}

#[test]
fn solve_writes_a_solution_file() {
    let dir = tempdir().expect("tempdir");
    let deck = trivial_deck();

    solve_cmd()
        .arg(&deck)
        .arg("--solutions")
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encoded solution"))
        .stdout(predicate::str::contains("kh_0_F"));

    let saved = std::fs::read_to_string(dir.path().join("sol_0")).expect("sol_0 written");
    let mut lines = saved.lines();
    assert_eq!(lines.next(), Some(deck.as_str()));
    assert_eq!(lines.next(), Some("kh_0_F"));
}

#[test]
fn second_run_reads_the_cache() {
    let dir = tempdir().expect("tempdir");
    let deck = trivial_deck();

    solve_cmd()
        .arg(&deck)
        .arg("--solutions")
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success();

    solve_cmd()
        .arg(&deck)
        .arg("--solutions")
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found existing solution"))
        .stdout(predicate::str::contains("kh_0_F"));

    assert!(dir.path().join("sol_0").exists());
    assert!(!dir.path().join("sol_1").exists(), "cache hit must not rewrite");
}

#[test]
fn malformed_deck_exits_nonzero() {
    let dir = tempdir().expect("tempdir");
    solve_cmd()
        .arg("not-a-deck")
        .arg("--solutions")
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn json_report_is_machine_readable() {
    let dir = tempdir().expect("tempdir");
    let output = solve_cmd()
        .arg(trivial_deck())
        .arg("--solutions")
        .arg(dir.path())
        .arg("--json")
        .output()
        .expect("run solve");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON report");
    assert_eq!(report["solved"], true);
    assert_eq!(report["solution"], "kh_0_F");
    assert_eq!(report["auto_moves"], 1);
}

#[test]
fn deal_is_reproducible_from_the_command_line() {
    let deal_cmd = || Command::cargo_bin("deal").expect("binary exists");

    let first = deal_cmd().arg("--seed").arg("7").output().expect("deal");
    let second = deal_cmd().arg("--seed").arg("7").output().expect("deal");
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    // Fresh deals have empty reserve and foundations.
    let line = String::from_utf8(first.stdout).expect("utf8");
    assert!(line.starts_with("0000000000000000"));
}
