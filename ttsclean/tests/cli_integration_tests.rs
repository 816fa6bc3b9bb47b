// ttsclean/tests/cli_integration_tests.rs
//! Command-line integration tests for the `ttsclean` binary.
//!
//! Every test points the config directory at an empty temporary directory so
//! that a developer's own `settings.yaml` never leaks into the results.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, NamedTempFile, TempDir};

fn ttsclean(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("ttsclean"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("TTSCLEAN_SETTINGS")
        .env_remove("RUST_LOG");
    cmd
}

fn yaml_file(contents: &str) -> Result<NamedTempFile> {
    let file = NamedTempFile::new()?;
    fs::write(file.path(), contents)?;
    Ok(file)
}

#[test]
fn sanitize_stdin_with_default_pipeline() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .arg("sanitize")
        .write_stdin("<b>Hello</b>   {{c1::world::planet}}[sound:hello.mp3]\n")
        .assert()
        .success()
        .stdout("Hello planet\n");
    Ok(())
}

#[test]
fn set_overrides_enable_rules() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["sanitize", "--set", "strip_note_parens=true", "--set", "sub_note_cloze=deleted"])
        .write_stdin("{{c1::Paris}} (the capital)")
        .assert()
        .success()
        .stdout("Paris\n");
    Ok(())
}

#[test]
fn settings_file_is_layered_over_defaults() -> Result<()> {
    let home = tempdir()?;
    let settings = yaml_file("strip_note_chars: \"*_\"\nsub_note_cloze: wrap\n")?;
    ttsclean(&home)
        .arg("sanitize")
        .arg("--settings")
        .arg(settings.path())
        .write_stdin("*Very* _important_ {{c1::x::hint}}")
        .assert()
        .success()
        .stdout("Very important ... hint\n");
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn user_settings_are_discovered_in_config_dir() -> Result<()> {
    let home = tempdir()?;
    let dir = home.path().join("ttsclean");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("settings.yaml"), "strip_note_brackets: true\n")?;
    ttsclean(&home)
        .arg("sanitize")
        .write_stdin("keep [drop] keep")
        .assert()
        .success()
        .stdout("keep keep\n");
    Ok(())
}

#[test]
fn templates_pipeline_can_be_selected() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["sanitize", "-p", "templates"])
        .write_stdin("Capital: <span class=cloze>[city]</span>")
        .assert()
        .success()
        .stdout("Capital: city\n");
    Ok(())
}

#[test]
fn input_and_output_files() -> Result<()> {
    let home = tempdir()?;
    let dir = tempdir()?;
    let input = dir.path().join("in.html");
    let output = dir.path().join("out.txt");
    fs::write(&input, "<p>One</p><p>Two</p>")?;

    ttsclean(&home)
        .arg("sanitize")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(&output)?, "One Two\n");
    Ok(())
}

#[test]
fn empty_result_prints_an_empty_line() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["sanitize", "--trace"])
        .write_stdin("   <br>  ")
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains("early exit"))
        .stderr(predicate::str::contains("(empty string)"));
    Ok(())
}

#[test]
fn trace_goes_to_stderr() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["sanitize", "--trace"])
        .write_stdin("<i>hi</i>")
        .assert()
        .success()
        .stdout("hi\n")
        .stderr(predicate::str::contains("clozes_braced(anki)"))
        .stderr(predicate::str::contains("Transformation using [clozes_braced(anki), html,"));
    Ok(())
}

#[test]
fn debug_logs_the_summary_line() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["-d", "sanitize"])
        .write_stdin("hi")
        .assert()
        .success()
        .stdout("hi\n")
        .stderr(predicate::str::contains("Transformation using ["));
    Ok(())
}

#[test]
fn json_output_is_the_transformation() -> Result<()> {
    let home = tempdir()?;
    let assert = ttsclean(&home)
        .args(["sanitize", "--json"])
        .write_stdin("<b>x</b>")
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["output"], "x");
    assert_eq!(value["early_exit"], false);
    assert_eq!(value["steps"][0]["rule"], "clozes_braced");
    assert_eq!(value["steps"][0]["params"], "anki");
    Ok(())
}

#[test]
fn custom_pipelines_file() -> Result<()> {
    let home = tempdir()?;
    let pipelines = yaml_file("pipelines:\n  shout:\n    - html\n    - rule: char_remove\n      value: drop\n")?;
    ttsclean(&home)
        .arg("sanitize")
        .args(["-p", "shout", "--set", "drop=z"])
        .arg("--pipelines")
        .arg(pipelines.path())
        .write_stdin("<b>lazy</b>")
        .assert()
        .success()
        .stdout("lay\n");
    Ok(())
}

#[test]
fn unknown_pipeline_fails() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["sanitize", "-p", "nope"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pipeline 'nope' not found"));
    Ok(())
}

#[test]
fn missing_setting_fails_at_startup() -> Result<()> {
    let home = tempdir()?;
    let pipelines = yaml_file("pipelines:\n  p:\n    - rule: html\n      when: undefined_key\n")?;
    ttsclean(&home)
        .args(["sanitize", "-p", "p", "--pipelines"])
        .arg(pipelines.path())
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined_key"));
    Ok(())
}

#[test]
fn unknown_rule_in_pipelines_file_fails() -> Result<()> {
    let home = tempdir()?;
    let pipelines = yaml_file("pipelines:\n  p:\n    - shout\n")?;
    ttsclean(&home)
        .args(["sanitize", "-p", "p", "--pipelines"])
        .arg(pipelines.path())
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse pipelines file"));
    Ok(())
}

#[test]
fn rules_lists_the_catalog() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("clozes_revealed"))
        .stdout(predicate::str::contains("within_parens"))
        .stdout(predicate::str::contains("collapse and trim whitespace"));
    Ok(())
}

#[test]
fn rules_for_a_pipeline_shows_active_rules() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .args(["rules", "--pipeline", "notes", "--set", "strip_note_parens=true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. clozes_braced(anki)"))
        .stdout(predicate::str::contains("within_parens"))
        .stdout(predicate::str::contains("within_brackets").not());
    Ok(())
}

#[test]
fn settings_prints_json() -> Result<()> {
    let home = tempdir()?;
    let assert = ttsclean(&home)
        .args(["settings", "--set", "cloze_context_before=2"])
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["sub_note_cloze"], "anki");
    assert_eq!(value["cloze_context_before"], 2);
    Ok(())
}

#[test]
fn no_arguments_prints_help() -> Result<()> {
    let home = tempdir()?;
    ttsclean(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}
