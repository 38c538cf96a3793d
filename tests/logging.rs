// tests/logging.rs

use logwait::cli::LogLevel;
use logwait::logging::{LINES_TARGET, LOG_ENV_VAR, build_filter, parse_level_str};
use tracing::Level;
use tracing::level_filters::LevelFilter;

#[test]
fn level_names_are_parsed_case_insensitively() {
    assert_eq!(parse_level_str("debug"), Some(Level::DEBUG));
    assert_eq!(parse_level_str(" WARN "), Some(Level::WARN));
    assert_eq!(parse_level_str("warning"), Some(Level::WARN));
    assert_eq!(parse_level_str("Trace"), Some(Level::TRACE));
    assert_eq!(parse_level_str("verbose"), None);
}

#[test]
fn default_filter_is_info_for_this_crate() {
    let filter = build_filter(None, None).unwrap();
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

    let blank = build_filter(None, Some("  ")).unwrap();
    assert_eq!(blank.max_level_hint(), Some(LevelFilter::INFO));
}

#[test]
fn cli_level_wins_over_environment() {
    let filter = build_filter(Some(LogLevel::Debug), Some("trace")).unwrap();
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}

#[test]
fn environment_accepts_bare_level_or_directives() {
    let bare = build_filter(None, Some("trace")).unwrap();
    assert_eq!(bare.max_level_hint(), Some(LevelFilter::TRACE));

    let directives = format!("logwait=debug,{LINES_TARGET}=trace");
    let scoped = build_filter(None, Some(&directives)).unwrap();
    assert_eq!(scoped.max_level_hint(), Some(LevelFilter::TRACE));
}

#[test]
fn malformed_environment_filter_is_reported() {
    let err = build_filter(None, Some("logwait=loud")).unwrap_err();
    assert!(err.to_string().contains(LOG_ENV_VAR));
}
