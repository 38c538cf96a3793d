// tests/config_loading.rs

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use logwait::cli::CliArgs;
use logwait::config::{
    MatchResult, PatternConfig, RawConfigFile, load_and_validate, load_from_path, parse_duration,
};
use logwait::errors::LogwaitError;
use logwait::types::PatternKind;
use logwait::waiter::{DEFAULT_SCAN_INTERVAL, DEFAULT_TIMEOUT};
use logwait::{apply_cli_overrides, resolve_config};
use logwait_test_utils::builders::RawConfigBuilder;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error<T: std::fmt::Debug>(result: logwait::errors::Result<T>) -> String {
    match result {
        Err(LogwaitError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(v) => panic!("Expected error, got Ok({:?})", v),
    }
}

#[test]
fn full_config_file_is_loaded_in_declaration_order() {
    let file = write_config(
        r#"
[wait]
path = "logs/app.log"
timeout = "90s"
scan_interval = "250ms"
trigger = "./deploy.sh --final"

[[pattern]]
match = "Completed"
result = "Completed"

[[pattern]]
match = "Process \\w+ failed"
kind = "regex"
result = "Failed"
exit_code = 3
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.path(), Path::new("logs/app.log"));
    assert_eq!(cfg.options().timeout, Duration::from_secs(90));
    assert_eq!(cfg.options().scan_interval, Duration::from_millis(250));
    assert_eq!(cfg.trigger(), Some("./deploy.sh --final"));

    let patterns = cfg.patterns();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].kind, PatternKind::Literal);
    assert_eq!(patterns[1].kind, PatternKind::Regex);
    assert_eq!(patterns[1].text, r"Process \w+ failed");

    let table = cfg.pattern_table().unwrap();
    assert_eq!(
        table.match_line("Process Deploy failed"),
        Some(&MatchResult {
            result: "Failed".to_string(),
            exit_code: 3,
        })
    );
    assert_eq!(
        table.match_line("all Completed").map(|m| m.exit_code),
        Some(0)
    );
}

#[test]
fn omitted_durations_use_defaults() {
    let cfg = RawConfigBuilder::new()
        .path("app.log")
        .literal("Completed", "ok")
        .build();

    assert_eq!(cfg.options().timeout, DEFAULT_TIMEOUT);
    assert_eq!(cfg.options().scan_interval, DEFAULT_SCAN_INTERVAL);
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(15 * 60));
    assert_eq!(DEFAULT_SCAN_INTERVAL, Duration::from_millis(500));
    assert_eq!(cfg.trigger(), None);
}

#[test]
fn missing_path_is_a_config_error() {
    let msg = expect_config_error(RawConfigBuilder::new().literal("Completed", "ok").try_build());
    assert!(msg.contains("--file"));
}

#[test]
fn config_without_patterns_is_rejected() {
    let file = write_config(
        r#"
[wait]
path = "app.log"
"#,
    );

    let msg = expect_config_error(load_and_validate(file.path()));
    assert!(msg.contains("[[pattern]]"));
}

#[test]
fn bad_or_zero_durations_are_rejected() {
    let msg = expect_config_error(
        RawConfigBuilder::new()
            .path("app.log")
            .timeout("soon")
            .literal("Completed", "ok")
            .try_build(),
    );
    assert!(msg.contains("timeout"));

    let msg = expect_config_error(
        RawConfigBuilder::new()
            .path("app.log")
            .scan_interval("0ms")
            .literal("Completed", "ok")
            .try_build(),
    );
    assert!(msg.contains("scan interval"));
}

#[test]
fn empty_match_text_is_rejected() {
    let msg = expect_config_error(
        RawConfigBuilder::new()
            .path("app.log")
            .literal("", "nothing")
            .try_build(),
    );
    assert!(msg.contains("empty"));
}

#[test]
fn duplicate_patterns_are_rejected() {
    let msg = expect_config_error(
        RawConfigBuilder::new()
            .path("app.log")
            .literal("Completed", "first")
            .literal("Completed", "second")
            .try_build(),
    );
    assert!(msg.contains("duplicate"));
}

#[test]
fn invalid_regex_returns_structured_error() {
    let result = RawConfigBuilder::new()
        .path("app.log")
        .regex("Process (", "broken")
        .try_build();

    match result {
        Err(LogwaitError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "Process ("),
        Err(e) => panic!("Expected InvalidPattern error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = write_config("[wait\npath = ");

    match load_from_path(file.path()) {
        Err(LogwaitError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_pattern_kind_is_a_toml_error() {
    let file = write_config(
        r#"
[[pattern]]
match = "x"
kind = "glob"
result = "x"
"#,
    );

    assert!(matches!(
        load_from_path(file.path()),
        Err(LogwaitError::TomlError(_))
    ));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_from_path(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(LogwaitError::IoError(_))));
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
    assert_eq!(parse_duration(" 15m "), Ok(Duration::from_secs(900)));
    assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    assert_eq!(parse_duration("10S"), Ok(Duration::from_secs(10)));

    assert!(parse_duration("").is_err());
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("ms").is_err());
    assert!(parse_duration("5d").is_err());
    assert!(parse_duration("18446744073709551615h").is_err());
}

#[test]
fn cli_pattern_splits_at_last_equals() {
    let p = PatternConfig::from_cli(PatternKind::Literal, "Completed=ok");
    assert_eq!((p.text.as_str(), p.result.as_str()), ("Completed", "ok"));

    let p = PatternConfig::from_cli(PatternKind::Literal, "mode=fast=FAST");
    assert_eq!((p.text.as_str(), p.result.as_str()), ("mode=fast", "FAST"));

    let p = PatternConfig::from_cli(PatternKind::Regex, "Not required");
    assert_eq!((p.text.as_str(), p.result.as_str()), ("Not required", "Not required"));
    assert_eq!(p.kind, PatternKind::Regex);

    let p = PatternConfig::from_cli(PatternKind::Literal, "trailing=");
    assert_eq!((p.text.as_str(), p.result.as_str()), ("trailing=", "trailing="));
}

#[test]
fn cli_flags_override_scalars_and_append_patterns() {
    let mut raw = RawConfigBuilder::new()
        .path("from-config.log")
        .timeout("1h")
        .literal("Completed", "Completed")
        .raw();

    let args = CliArgs::try_parse_from([
        "logwait",
        "--file",
        "from-cli.log",
        "--timeout",
        "90s",
        "--interval",
        "100ms",
        "-p",
        "Not required=skipped",
        "-r",
        r"Process \w+ failed=Failed",
        "--trigger",
        "make deploy",
    ])
    .unwrap();

    apply_cli_overrides(&mut raw, &args);

    assert_eq!(raw.wait.path.as_deref(), Some(Path::new("from-cli.log")));
    assert_eq!(raw.wait.timeout.as_deref(), Some("90000ms"));
    assert_eq!(raw.wait.scan_interval.as_deref(), Some("100ms"));
    assert_eq!(raw.wait.trigger.as_deref(), Some("make deploy"));

    let texts: Vec<(&str, PatternKind)> = raw
        .pattern
        .iter()
        .map(|p| (p.text.as_str(), p.kind))
        .collect();
    assert_eq!(
        texts,
        vec![
            ("Completed", PatternKind::Literal),
            ("Not required", PatternKind::Literal),
            (r"Process \w+ failed", PatternKind::Regex),
        ]
    );
}

#[test]
fn resolve_config_merges_file_and_flags() {
    let file = write_config(
        r#"
[wait]
path = "logs/app.log"

[[pattern]]
match = "Completed"
result = "Completed"
"#,
    );
    let config_path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::try_parse_from([
        "logwait",
        "--config",
        config_path.as_str(),
        "--timeout",
        "2m",
    ])
    .unwrap();

    let cfg = resolve_config(&args).unwrap();
    assert_eq!(cfg.path(), Path::new("logs/app.log"));
    assert_eq!(cfg.options().timeout, Duration::from_secs(120));
    assert_eq!(cfg.patterns().len(), 1);
}

#[test]
fn resolve_config_from_flags_alone() {
    let args = CliArgs::try_parse_from([
        "logwait",
        "-f",
        "build.log",
        "-p",
        "BUILD OK=ok",
    ])
    .unwrap();

    let cfg = resolve_config(&args).unwrap();
    assert_eq!(cfg.path(), Path::new("build.log"));
    assert_eq!(cfg.patterns()[0].result, "ok");
}

#[test]
fn invalid_duration_flag_is_rejected_by_the_parser() {
    let err = CliArgs::try_parse_from(["logwait", "-f", "a.log", "--timeout", "forever"]);
    assert!(err.is_err());
}

#[test]
fn empty_raw_config_has_no_path_or_patterns() {
    let raw = RawConfigFile::default();
    assert!(raw.wait.path.is_none());
    assert!(raw.pattern.is_empty());
}
