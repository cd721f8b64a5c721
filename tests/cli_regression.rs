// Regression tests: drive the compiled binary end to end.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

#[test]
fn tree_prints_the_grammar_listing() {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.arg("tree").arg("data/core_utils.json");
    cmd.assert()
        .success()
        .stdout(contains("[Program]").and(contains("[Command] find")));
}

#[test]
fn commands_reports_the_load_census() {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.arg("commands").arg("data/core_utils.json");
    cmd.assert()
        .success()
        .stdout(contains("loading from data/core_utils.json").and(contains(" > loaded find (1)")));
}

#[test]
fn validate_rejects_a_broken_grammar_with_a_diagnostic() {
    let bad_file = format!(
        "{}/trellis-bad-grammar-{}.json",
        std::env::temp_dir().display(),
        std::process::id()
    );
    fs::write(
        &bad_file,
        r#"[{ "name": "x", "option": { "type": "sideways_option" } }]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.arg("validate").arg(&bad_file);
    cmd.assert()
        .failure()
        .stderr(contains("trellis::schema").and(contains("sideways_option")));

    let _ = fs::remove_file(&bad_file);
}

#[test]
fn validate_accepts_the_bundled_grammar() {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.arg("validate").arg("data/core_utils.json");
    cmd.assert().success().stdout(contains("ok: 5 command(s)"));
}

#[test]
fn a_scripted_session_reaches_acceptance() {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.arg("session").arg("data/core_utils.json");
    cmd.write_stdin("find\n-name\nPattern\n<DONE>\n");
    cmd.assert()
        .success()
        .stdout(contains("choices: <DONE>, find, ls, head, du, tar").and(contains("accepted: find -name Pattern")));
}

#[test]
fn a_session_survives_an_invalid_label() {
    let mut cmd = Command::cargo_bin("trellis").unwrap();
    cmd.arg("session").arg("data/core_utils.json");
    cmd.write_stdin("frobnicate\nls\n-l\n<DONE>\n");
    cmd.assert()
        .success()
        .stderr(contains("not one of the current choices"))
        .stdout(contains("accepted: ls -l"));
}
