// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::parse_duration;

/// Command-line arguments for `logwait`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "logwait",
    version,
    about = "Block until a pattern shows up in a (rotating) log file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// Default: `Logwait.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file to watch. Overrides `[wait].path`.
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Substring pattern as `TEXT=RESULT` (or just `TEXT`). Repeatable;
    /// earlier patterns win.
    #[arg(long = "pattern", short = 'p', value_name = "TEXT=RESULT")]
    pub patterns: Vec<String>,

    /// Regex pattern as `REGEX=RESULT`. Repeatable; tried after `--pattern`s.
    #[arg(long = "regex", short = 'r', value_name = "REGEX=RESULT")]
    pub regexes: Vec<String>,

    /// Give up after this long, e.g. `90s`, `15m`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Delay between polls, e.g. `500ms`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Shell command to run once before polling starts.
    #[arg(long, value_name = "CMD")]
    pub trigger: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LOGWAIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate and print the effective configuration, but don't wait.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
