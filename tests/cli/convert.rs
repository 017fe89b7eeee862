//! Convert subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_convert_stdin_to_stdout() {
    cargo_bin_cmd!("gamut")
        .arg("convert")
        .write_stdin("# Heading\n\nParagraph with *emphasis*.")
        .assert()
        .success()
        .stdout("<h1 id=\"heading\">Heading</h1>\n\n<p>Paragraph with <em>emphasis</em>.</p>\n");
}

#[test]
fn test_convert_empty_stdin() {
    cargo_bin_cmd!("gamut")
        .arg("convert")
        .write_stdin("")
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn test_convert_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("doc.md");
    fs::write(&test_file, "* one\n* two\n").unwrap();

    cargo_bin_cmd!("gamut")
        .args(["convert", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
}

#[test]
fn test_convert_missing_file() {
    cargo_bin_cmd!("gamut")
        .args(["convert", "/nonexistent/doc.md"])
        .assert()
        .failure();
}

#[test]
fn test_convert_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("doc.md");
    let out_file = temp_dir.path().join("doc.html");
    fs::write(&test_file, "Hello `code`\n").unwrap();

    cargo_bin_cmd!("gamut")
        .args([
            "convert",
            "--output",
            out_file.to_str().unwrap(),
            test_file.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&out_file).unwrap();
    assert_eq!(content, "<p>Hello <code>code</code></p>");
}

#[test]
fn test_convert_fenced_block_keeps_newline_by_default() {
    cargo_bin_cmd!("gamut")
        .arg("convert")
        .write_stdin("```js\nx\n```\n")
        .assert()
        .success()
        .stdout("<pre><code class=\"js\">x\n</code></pre>\n");
}

#[test]
fn test_convert_omit_extra_wl_flag() {
    cargo_bin_cmd!("gamut")
        .args(["convert", "--omit-extra-wl"])
        .write_stdin("```js\nx\n```\n")
        .assert()
        .success()
        .stdout("<pre><code class=\"js\">x</code></pre>\n");
}

#[test]
fn test_convert_with_explicit_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("custom.toml");
    fs::write(&config_file, "omit-extra-wl-in-code-blocks = true\n").unwrap();

    cargo_bin_cmd!("gamut")
        .args(["convert", "--config", config_file.to_str().unwrap()])
        .write_stdin("```\nx\n```\n")
        .assert()
        .success()
        .stdout("<pre><code>x</code></pre>\n");
}

#[test]
fn test_convert_discovers_config_next_to_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".gamut.toml"),
        "omitExtraWLInCodeBlocks = true\n",
    )
    .unwrap();
    let test_file = temp_dir.path().join("doc.md");
    fs::write(&test_file, "```\nx\n```\n").unwrap();

    cargo_bin_cmd!("gamut")
        .args(["convert", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout("<pre><code>x</code></pre>\n");
}

#[test]
fn test_convert_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    fs::write(&config_file, "omit-extra-wl-in-code-blocks = \"maybe\"\n").unwrap();

    cargo_bin_cmd!("gamut")
        .args(["convert", "--config", config_file.to_str().unwrap()])
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
