// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::config::duration::parse_duration;
use crate::errors::{LogwaitError, Result};
use crate::types::PatternKind;
use crate::waiter::{WaitOptions, DEFAULT_SCAN_INTERVAL, DEFAULT_TIMEOUT};
use crate::watch::matcher::PatternTable;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [wait]
/// path = "logs/app.log"
/// timeout = "15m"
/// scan_interval = "500ms"
/// trigger = "./deploy.sh"
///
/// [[pattern]]
/// match = "Completed"
/// result = "Completed"
///
/// [[pattern]]
/// match = "Process \\w+ failed"
/// kind = "regex"
/// result = "Failed"
/// exit_code = 1
/// ```
///
/// Nothing here is checked yet; convert into [`ConfigFile`] for that.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub wait: WaitSection,

    /// `[[pattern]]` entries, in evaluation order.
    #[serde(default)]
    pub pattern: Vec<PatternConfig>,
}

/// `[wait]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitSection {
    /// Log file to watch. May be supplied on the command line instead.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Duration string, e.g. `"15m"`. Defaults to 15 minutes.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Duration string, e.g. `"500ms"`. Defaults to 500ms.
    #[serde(default)]
    pub scan_interval: Option<String>,

    /// Shell command run once before polling starts.
    #[serde(default)]
    pub trigger: Option<String>,
}

/// One `[[pattern]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    /// Text searched for in each line.
    #[serde(rename = "match")]
    pub text: String,

    #[serde(default)]
    pub kind: PatternKind,

    /// Value reported when this pattern matches.
    pub result: String,

    /// Process exit code for the CLI when this pattern matches.
    #[serde(default)]
    pub exit_code: Option<i32>,
}

impl PatternConfig {
    pub fn new(kind: PatternKind, text: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            result: result.into(),
            exit_code: None,
        }
    }

    /// Parse the `TEXT=RESULT` form used on the command line.
    ///
    /// The split happens at the last `=`, so `TEXT` may itself contain `=`.
    /// A bare `TEXT` uses the text as its own result.
    pub fn from_cli(kind: PatternKind, arg: &str) -> Self {
        match arg.rsplit_once('=') {
            Some((text, result)) if !text.is_empty() && !result.is_empty() => {
                Self::new(kind, text, result)
            }
            _ => Self::new(kind, arg, arg),
        }
    }
}

/// Value attached to each pattern by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub result: String,
    pub exit_code: i32,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    options: WaitOptions,
    trigger: Option<String>,
    patterns: Vec<PatternConfig>,
}

impl ConfigFile {
    /// Construct without validation; used by `TryFrom<RawConfigFile>` once
    /// the checks have passed.
    pub(crate) fn new_unchecked(
        path: PathBuf,
        options: WaitOptions,
        trigger: Option<String>,
        patterns: Vec<PatternConfig>,
    ) -> Self {
        Self {
            path,
            options,
            trigger,
            patterns,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn options(&self) -> WaitOptions {
        self.options
    }

    pub fn trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }

    pub fn patterns(&self) -> &[PatternConfig] {
        &self.patterns
    }

    /// Compile the pattern list into a [`PatternTable`].
    pub fn pattern_table(&self) -> Result<PatternTable<MatchResult>> {
        let mut table = PatternTable::new();
        for p in &self.patterns {
            table.push(
                p.kind,
                p.text.clone(),
                MatchResult {
                    result: p.result.clone(),
                    exit_code: p.exit_code.unwrap_or(0),
                },
            )?;
        }
        Ok(table)
    }
}

impl WaitSection {
    pub(crate) fn effective_timeout(&self) -> Result<Duration> {
        parse_optional_duration("timeout", self.timeout.as_deref(), DEFAULT_TIMEOUT)
    }

    pub(crate) fn effective_scan_interval(&self) -> Result<Duration> {
        parse_optional_duration(
            "scan_interval",
            self.scan_interval.as_deref(),
            DEFAULT_SCAN_INTERVAL,
        )
    }
}

fn parse_optional_duration(field: &str, value: Option<&str>, default: Duration) -> Result<Duration> {
    match value {
        None => Ok(default),
        Some(s) => parse_duration(s).map_err(|e| {
            LogwaitError::ConfigError(format!("[wait].{field}: {e}"))
        }),
    }
}
