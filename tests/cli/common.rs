//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("gamut")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gamut converts Markdown"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("gamut")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("gamut")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("gamut")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_convert_help() {
    cargo_bin_cmd!("gamut")
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a Markdown document"));
}

#[test]
fn test_passes_lists_default_order() {
    cargo_bin_cmd!("gamut")
        .arg("passes")
        .assert()
        .success()
        .stdout(
            "detab\nstripBlankLines\ngithubCodeBlocks\nhashHTMLBlocks\n\
             stripLinkDefinitions\nblockGamut\nunescapeSpecialChars\n",
        );
}

#[test]
fn test_missing_explicit_config_fails() {
    cargo_bin_cmd!("gamut")
        .args(["convert", "--config", "/nonexistent/gamut.toml"])
        .write_stdin("text")
        .assert()
        .failure();
}
