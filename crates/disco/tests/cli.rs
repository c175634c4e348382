//! CLI integration tests for disco commands.
//!
//! These tests focus on exit codes and the substance of the output, not on styling,
//! which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// A configuration exercising fields, groups, facets and snippet settings.
const FIXTURE: &str = r#"root = true

[fields]
title = { boost = 2.0, exact = "title-exact", stemmed = "title-stemmed" }
"orig-place-search" = { boost = 7.0 }
"binding-orig-place-search" = {}

[groups]
ORIGIN = ["binding-orig-place-search", "orig-place-search"]

[facets]
fields = ["type-facet", "format-facet", "orig-date-from-facet", "orig-date-to-facet"]
tags = { "format-facet" = "format" }

[snippet]
padding = 30
"#;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a disco command with logging left at its default level.
fn disco() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("disco").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper to run `disco` in `dir` with HOME isolated to `home`.
fn disco_in(dir: &Path, home: &Path) -> Command {
    let mut cmd = disco();
    cmd.current_dir(dir).env("HOME", home);
    cmd
}

/// A working directory holding the fixture config, plus an empty home.
fn fixture() -> (tempfile::TempDir, tempfile::TempDir) {
    let dir = temp_dir();
    fs::write(dir.path().join(".disco.toml"), FIXTURE).unwrap();
    (dir, temp_dir())
}

/// Strips ANSI escape sequences from a string.
fn strip_ansi(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }

    output
}

/// Runs a command expected to succeed and returns its stdout without styling.
fn stdout_of(cmd: &mut Command) -> String {
    let assert = cmd.assert().success();
    strip_ansi(&String::from_utf8_lossy(&assert.get_output().stdout))
}

/// Runs a command expected to succeed and parses its stdout as JSON.
fn json_of(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    serde_json::from_slice(&assert.get_output().stdout).unwrap()
}

mod compile {
    use super::*;

    #[test]
    fn compiles_boosted_comparison() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).args(["compile", "title==Bible"]));
        assert!(out.contains("title:\"Bible\"^2.0"), "unexpected output: {out}");
        assert!(out.contains("fields: title^2.0"), "unexpected output: {out}");
    }

    #[test]
    fn expands_groups() {
        let (dir, home) = fixture();
        let out = stdout_of(
            disco_in(dir.path(), home.path()).args(["compile", "ORIGIN==Berlin;title==Bible"]),
        );
        assert!(
            out.contains(
                "(binding-orig-place-search:\"Berlin\" OR orig-place-search:\"Berlin\"^7.0) \
                 AND title:\"Bible\"^2.0"
            ),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn json_output() {
        let (dir, home) = fixture();
        let json = json_of(
            disco_in(dir.path(), home.path()).args(["compile", "--json", "ORIGIN==Berlin;title==Bible"]),
        );
        assert_eq!(
            json["fields"],
            serde_json::json!(["binding-orig-place-search", "orig-place-search^7.0", "title^2.0"])
        );
        assert!(json["query"].as_str().unwrap().ends_with("title:\"Bible\"^2.0"));
        assert!(json.get("expression").is_none());
    }

    #[test]
    fn explain_shows_tree() {
        let (dir, home) = fixture();
        let out = stdout_of(
            disco_in(dir.path(), home.path()).args(["compile", "--explain", "title==a,title==b"]),
        );
        assert!(out.contains("Tree:"));
        assert!(out.contains("Or"));
        assert!(out.contains("Comparison"));
        assert!(out.contains("title:\"a\"^2.0 OR title:\"b\"^2.0"));
    }

    #[test]
    fn explain_json_includes_expression() {
        let (dir, home) = fixture();
        let json = json_of(
            disco_in(dir.path(), home.path()).args(["compile", "--json", "--explain", "title==a"]),
        );
        assert_eq!(json["expression"], "title==a");
    }

    #[test]
    fn free_text_uses_variants() {
        let (dir, home) = fixture();
        let out = stdout_of(
            disco_in(dir.path(), home.path()).args(["compile", "title=='\"codex gigas\" devil'"]),
        );
        assert!(
            out.contains("(title-exact:\"codex gigas\" AND title-stemmed:devil)^2.0"),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn unknown_field_fails() {
        let (dir, home) = fixture();
        disco_in(dir.path(), home.path())
            .args(["compile", "nope==x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid field 'nope'"));
    }

    #[test]
    fn syntax_error_fails() {
        let (dir, home) = fixture();
        disco_in(dir.path(), home.path())
            .args(["compile", "title==\"Bible"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("expression syntax error"));
    }

    #[test]
    fn blank_expression() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).args(["compile", "  "]));
        assert!(out.contains("no query"));
    }

    #[test]
    fn explicit_config_path() {
        let dir = temp_dir();
        let home = temp_dir();
        let conf = dir.path().join("conf");
        fs::create_dir(&conf).unwrap();
        fs::write(conf.join("schema.toml"), FIXTURE).unwrap();

        disco_in(dir.path(), home.path())
            .args(["compile", "title==Bible"])
            .assert()
            .failure();

        let out = stdout_of(disco_in(dir.path(), home.path()).args([
            "-c",
            "conf/schema.toml",
            "compile",
            "title==Bible",
        ]));
        assert!(out.contains("title:\"Bible\"^2.0"));
    }

    #[test]
    fn missing_explicit_config_fails() {
        let dir = temp_dir();
        disco_in(dir.path(), dir.path())
            .args(["--config", "absent.toml", "compile", "title==a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod filter {
    use super::*;

    const TYPES: &str = "type-facet:(\"object\" OR \"description\" OR \"description-retro\")";

    #[test]
    fn builds_tagged_params() {
        let (dir, home) = fixture();
        let json = json_of(disco_in(dir.path(), home.path()).args([
            "filter",
            "--json",
            r#"{"format-facet": ["Codex"]}"#,
        ]));
        assert_eq!(
            json["params"],
            serde_json::json!([
                format!("{{!tag=type-facet}}{TYPES}"),
                "{!tag=format}format-facet:(\"Codex\")"
            ])
        );
        assert_eq!(json["filters"]["format-facet:(\"Codex\")"], "format");
    }

    #[test]
    fn table_output() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).args([
            "filter",
            r#"{"format-facet": "__MISSING__"}"#,
        ]));
        assert!(out.contains("Clause"));
        assert!(out.contains("-format-facet:[* TO *]"));
        assert!(out.contains("format"));
    }

    #[test]
    fn date_filter() {
        let (dir, home) = fixture();
        let json = json_of(disco_in(dir.path(), home.path()).args([
            "filter",
            "--json",
            r#"{"orig-date-facet": {"from": 1400, "to": 1500, "exact": true}}"#,
        ]));
        let params = json["params"].as_array().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(
            params[1],
            "{!tag=orig-date-from-facet}orig-date-from-facet:[1400 TO *] AND orig-date-to-facet:[* TO 1500]"
        );
    }

    #[test]
    fn malformed_type_keeps_default_types() {
        let (dir, home) = fixture();
        let json = json_of(disco_in(dir.path(), home.path()).args([
            "filter",
            "--json",
            r#"{"type-facet": true}"#,
        ]));
        assert_eq!(
            json["params"],
            serde_json::json!([format!("{{!tag=type-facet}}{TYPES}")])
        );
    }

    #[test]
    fn null_root_means_no_filters() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).args(["filter", "null"]));
        assert!(out.contains("no filters"));

        let json = json_of(disco_in(dir.path(), home.path()).args(["filter", "--json", "null"]));
        assert!(json["filters"].is_null());
        assert_eq!(json["params"], serde_json::json!([]));
    }

    #[test]
    fn malformed_root_is_lenient_by_default() {
        let (dir, home) = fixture();
        disco_in(dir.path(), home.path())
            .args(["filter", "[1, 2]"])
            .assert()
            .success()
            .stdout(predicate::str::contains("no filters"))
            .stderr(predicate::str::contains("ignoring malformed filter specification"));
    }

    #[test]
    fn strict_rejects_malformed_root() {
        let (dir, home) = fixture();
        disco_in(dir.path(), home.path())
            .args(["filter", "--strict", "not json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("malformed filter specification"));
    }

    #[test]
    fn strict_from_config() {
        let dir = temp_dir();
        let config = format!("{FIXTURE}\n[filter]\nstrict_root = true\n");
        fs::write(dir.path().join(".disco.toml"), config).unwrap();

        disco_in(dir.path(), dir.path())
            .args(["filter", "\"format-facet\""])
            .assert()
            .failure();
    }
}

mod spellcheck {
    use super::*;

    #[test]
    fn merges_outside_quotes() {
        disco()
            .args(["spellcheck", "Bärlin \"Staatsbibliothek zu Bärlin\"", "Berlin"])
            .assert()
            .success()
            .stdout("Berlin \"Staatsbibliothek zu Bärlin\"\n");
    }

    #[test]
    fn query_lists_unquoted_words() {
        disco()
            .args(["spellcheck", "--query", "Bärlin \"zu Bärlin\"  Kodex"])
            .assert()
            .success()
            .stdout("Bärlin Kodex\n");
    }

    #[test]
    fn query_with_only_phrases() {
        disco()
            .args(["spellcheck", "--query", "\"zu Bärlin\""])
            .assert()
            .success()
            .stdout("");
    }
}

mod tokenize {
    use super::*;

    #[test]
    fn json_segments() {
        let json = json_of(disco().args(["tokenize", "--json", "codex \"lost gospel\" leaf"]));
        assert_eq!(
            json,
            serde_json::json!([
                {"text": "codex", "quoted": false},
                {"text": "\"lost gospel\"", "quoted": true},
                {"text": "leaf", "quoted": false}
            ])
        );
    }

    #[test]
    fn table_segments() {
        let out = stdout_of(disco().args(["tokenize", "a \"b c\""]));
        assert!(out.contains("quoted"));
        assert!(out.contains("words"));
    }
}

mod snippet {
    use super::*;

    const TEXT: &str = "Lorem ipsum dolor sit amet. Consectetur adipiscing elit; sed do eiusmod";

    #[test]
    fn stops_at_dividers() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).args(["snippet", TEXT, "adipiscing"]));
        assert!(out.starts_with("Consectetur <em>adipiscing</em> elit\n"), "unexpected output: {out}");
        assert!(out.contains("Windows:"));
        assert!(out.contains("28..55"));
    }

    #[test]
    fn json_output() {
        let (dir, home) = fixture();
        let json = json_of(disco_in(dir.path(), home.path()).args([
            "snippet",
            "--json",
            "--padding",
            "0",
            TEXT,
            "lorem",
            "eiusmod",
        ]));
        assert_eq!(json["text"], "<em>Lorem</em> … <em>eiusmod</em>");
        assert_eq!(json["windows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn no_matches() {
        disco()
            .args(["snippet", TEXT, "manuscript"])
            .assert()
            .success()
            .stdout(predicate::str::contains("no matches"));
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_effective_settings() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).arg("config"));
        assert!(out.contains("[filter]"));
        assert!(out.contains("padding = 30"));
        assert!(out.contains("ORIGIN"));
    }

    #[test]
    fn invalid_toml_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".disco.toml"), "[fields\n").unwrap();
        disco_in(dir.path(), dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error: failed to load configuration"));
    }
}

mod check {
    use super::*;

    #[test]
    fn succeeds_without_config() {
        let dir = temp_dir();
        disco_in(dir.path(), dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found"));
    }

    #[test]
    fn succeeds_with_valid_config() {
        let (dir, home) = fixture();
        let out = stdout_of(disco_in(dir.path(), home.path()).arg("check"));
        assert!(out.contains("No issues found"));
        assert!(out.contains("3 fields, 1 groups, 4 facets"));
    }

    #[test]
    fn fails_with_warnings() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".disco.toml"),
            "[fields]\ntitle = {}\n\n[groups]\nORIGIN = [\"place\"]\n",
        )
        .unwrap();

        let assert = disco_in(dir.path(), dir.path())
            .arg("check")
            .assert()
            .failure();
        let out = strip_ansi(&String::from_utf8_lossy(&assert.get_output().stdout));
        assert!(out.contains("group 'ORIGIN' references undefined field 'place'"));
        assert!(out.contains("Hint:"));
    }

    #[test]
    fn empty_config_warns() {
        let dir = temp_dir();
        fs::write(dir.path().join(".disco.toml"), "").unwrap();
        disco_in(dir.path(), dir.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("no searchable fields"));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        let home = temp_dir();

        disco_in(dir.path(), home.path())
            .arg("init")
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".disco.toml")).unwrap();
        assert!(contents.contains("# [fields]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".disco.toml"), "existing").unwrap();

        disco_in(dir.path(), temp_dir().path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        fs::write(dir.path().join(".disco.toml"), "[broken").unwrap();

        disco_in(dir.path(), temp_dir().path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".disco.toml")).unwrap();
        assert!(contents.contains("# [groups]"));
    }

    #[test]
    fn global_writes_to_home() {
        let dir = temp_dir();
        let home = temp_dir();

        disco_in(dir.path(), home.path())
            .args(["init", "--global"])
            .assert()
            .success();

        assert!(home.path().join(".disco.toml").exists());
        assert!(!dir.path().join(".disco.toml").exists());
    }

    #[test]
    fn prints_config_preview() {
        let dir = temp_dir();
        let out = stdout_of(disco_in(dir.path(), temp_dir().path()).arg("init"));
        assert!(out.contains("Configuration written:"));
        assert!(out.contains("ORIGIN"));
    }
}
