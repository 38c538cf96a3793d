// src/logging.rs

//! Logging setup for `logwait` using `tracing` + `tracing-subscriber`.
//!
//! Events from this crate are filtered at the chosen level; everything else
//! only shows warnings. Every scanned line is logged at TRACE under the
//! `logwait::lines` target, so `LOGWAIT_LOG=logwait=debug,logwait::lines=trace`
//! dumps the log content without the rest of the trace noise.
//!
//! Logs go to STDERR; STDOUT carries only the matched result.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given. Accepts a
/// bare level (`debug`) or full filter directives.
pub const LOG_ENV_VAR: &str = "LOGWAIT_LOG";

/// Target of the per-line TRACE events emitted while matching.
pub const LINES_TARGET: &str = "logwait::lines";

const DEFAULT_DIRECTIVES: &str = "warn,logwait=info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env.as_deref())?;
    let show_target = matches!(filter.max_level_hint(), Some(l) if l >= LevelFilter::DEBUG);

    fmt()
        .with_env_filter(filter)
        .with_target(show_target)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Resolve the filter: `--log-level`, then `LOGWAIT_LOG`, then
/// `warn,logwait=info`.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(lvl) = cli_level {
        return Ok(scoped(level_from_log_level(lvl)));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => match parse_level_str(s) {
            Some(level) => Ok(scoped(level)),
            None => EnvFilter::try_new(s)
                .with_context(|| format!("invalid {LOG_ENV_VAR} filter `{s}`")),
        },
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}

fn scoped(level: tracing::Level) -> EnvFilter {
    EnvFilter::new(format!(
        "warn,logwait={}",
        level.as_str().to_ascii_lowercase()
    ))
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Parse a bare level name as accepted in `LOGWAIT_LOG`.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
