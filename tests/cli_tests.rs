//! CLI-level smoke tests via `assert_cmd`.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_subcommand_reports_primitive_verdict() {
    Command::cargo_bin("primpoly")
        .unwrap()
        .args(["test", "x^4 + x^2 + 2 x + 3, 5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"primitive\""));
}

#[test]
fn test_subcommand_reports_not_primitive() {
    // x^5 + x + 1 factors as (x^2+x+1)(x^3+x^2+1) over GF(2).
    Command::cargo_bin("primpoly")
        .unwrap()
        .args(["test", "x^5 + x + 1, 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"not_irreducible\""));
}

#[test]
fn factor_subcommand_reports_trial_division_factors() {
    Command::cargo_bin("primpoly")
        .unwrap()
        .args(["factor", "337500", "--strategy", "trial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"337500\""));
}

#[test]
fn search_subcommand_finds_a_primitive_polynomial_over_gf2() {
    Command::cargo_bin("primpoly")
        .unwrap()
        .args(["search", "--p", "2", "--n", "2", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(", 2"));
}

#[test]
fn count_subcommand_prints_known_value() {
    // phi(2^2-1)/2 = phi(3)/2 = 1
    Command::cargo_bin("primpoly")
        .unwrap()
        .args(["count", "--p", "2", "--n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn rejects_malformed_polynomial_input() {
    Command::cargo_bin("primpoly")
        .unwrap()
        .args(["test", "not a polynomial"])
        .assert()
        .failure();
}
