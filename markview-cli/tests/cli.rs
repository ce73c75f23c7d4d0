use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Run in an empty directory so no stray `markview.toml` is picked up.
fn markview(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("markview");
    cmd.current_dir(dir.path()).env_remove("MARKVIEW_LOG");
    cmd
}

#[test]
fn pretty_prints_stdin() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .args(["--format", "pretty"])
        .write_stdin("<a><b>text</b></a>")
        .assert()
        .success()
        .stdout("<a>\n  <b>\n    text\n  </b>\n</a>\n");
}

#[test]
fn reads_a_file_argument() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.xml");
    fs::write(&path, r#"<?xml version="1.0"?><r/>"#).unwrap();

    markview(&dir)
        .arg(&path)
        .args(["--format", "pretty"])
        .assert()
        .success()
        .stdout("<?xml version=\"1.0\"?>\n<r/>\n");
}

#[test]
fn highlight_without_color_matches_pretty() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .args(["--color", "never"])
        .write_stdin("<a k='v'>x</a>")
        .assert()
        .success()
        .stdout("<a k='v'>\n  x\n</a>\n");
}

#[test]
fn highlight_with_color_emits_escapes() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .args(["--color", "always"])
        .write_stdin("<a k='v'>x</a>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[").and(predicate::str::contains("k")));
}

#[test]
fn raw_flag_echoes_input() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .arg("--raw")
        .write_stdin("<a><b/></a>")
        .assert()
        .success()
        .stdout("<a><b/></a>");
}

#[test]
fn raw_flag_keeps_invalid_utf8_bytes() {
    let dir = TempDir::new().unwrap();
    let input = b"<a>\xff\xfe</a>".to_vec();
    let output = markview(&dir)
        .arg("--raw")
        .write_stdin(input.clone())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, input);
}

#[test]
fn flat_declarations_flag_keeps_doctype_level() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .args(["--format", "pretty"])
        .write_stdin("<!DOCTYPE r><r>x</r>")
        .assert()
        .success()
        .stdout("<!DOCTYPE r>\n  <r>\n    x\n  </r>\n");

    markview(&dir)
        .args(["--format", "pretty", "--flat-declarations"])
        .write_stdin("<!DOCTYPE r><r>x</r>")
        .assert()
        .success()
        .stdout("<!DOCTYPE r>\n<r>\n  x\n</r>\n");
}

#[test]
fn spans_json_lists_categories() {
    let dir = TempDir::new().unwrap();
    let output = markview(&dir)
        .args(["--format", "spans-json"])
        .write_stdin("<!-- note --><x a=\"1\"/>")
        .output()
        .unwrap();
    assert!(output.status.success());

    let spans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let spans = spans.as_array().unwrap();
    assert_eq!(spans[0]["text"], "<!-- note -->");
    assert_eq!(spans[0]["category"], "comment");
    let categories: Vec<_> = spans
        .iter()
        .map(|span| span["category"].as_str().unwrap().to_string())
        .collect();
    assert!(categories.contains(&"attribute_value".to_string()));
    let joined: String = spans
        .iter()
        .map(|span| span["text"].as_str().unwrap())
        .collect();
    assert_eq!(joined, "<!-- note -->\n<x a=\"1\"/>");
}

#[test]
fn tokens_json_uses_kind_names() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .args(["--format", "tokens-json"])
        .write_stdin("</a>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tag-close-name\""));
}

#[test]
fn lines_json_reports_depths() {
    let dir = TempDir::new().unwrap();
    let output = markview(&dir)
        .args(["--format", "lines-json"])
        .write_stdin("<a><b>")
        .output()
        .unwrap();
    let lines: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(lines[0]["depth"], 0);
    assert_eq!(lines[1]["text"], "<b>");
    assert_eq!(lines[1]["depth"], 1);
}

#[test]
fn empty_input_prints_nothing() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .args(["--format", "pretty"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn config_file_and_flags_layer() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[reflow]\nindent_unit = \"    \"\n").unwrap();

    markview(&dir)
        .arg("--config")
        .arg(&config)
        .args(["--format", "pretty"])
        .write_stdin("<a><b/></a>")
        .assert()
        .success()
        .stdout("<a>\n    <b/>\n</a>\n");

    markview(&dir)
        .arg("--config")
        .arg(&config)
        .args(["--format", "pretty", "--indent", "."])
        .write_stdin("<a><b/></a>")
        .assert()
        .success()
        .stdout("<a>\n.<b/>\n</a>\n");
}

#[test]
fn local_config_is_picked_up() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("markview.toml"),
        "[reflow]\nguard_literals = true\n",
    )
    .unwrap();

    markview(&dir)
        .args(["--format", "pretty"])
        .write_stdin("<a><!-- x><y --></a>")
        .assert()
        .success()
        .stdout("<a>\n  <!-- x><y -->\n</a>\n");
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();
    markview(&dir)
        .arg(dir.path().join("absent.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Cannot read"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[render]\ncolor = \"sometimes\"\n").unwrap();

    markview(&dir)
        .arg("--config")
        .arg(&config)
        .write_stdin("<a/>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
