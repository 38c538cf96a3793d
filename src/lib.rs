// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod trigger;
pub mod types;
pub mod waiter;
pub mod watch;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{
    default_config_path, load_from_path, ConfigFile, MatchResult, PatternConfig, RawConfigFile,
};
use crate::types::PatternKind;

pub use crate::types::WaitOutcome;
pub use crate::waiter::{wait_for_content, LogWaiter, WaitOptions};
pub use crate::watch::PatternTable;

/// Exit code used when the wait times out.
pub const EXIT_TIMEOUT: i32 = 2;

/// Exit code used when the wait is interrupted with Ctrl-C.
pub const EXIT_CANCELLED: i32 = 130;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - the trigger command
/// - the waiter
/// - Ctrl-C handling
///
/// Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = resolve_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(0);
    }

    let patterns = cfg.pattern_table()?;

    // Ctrl-C → cancel the wait.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    let waiter = LogWaiter::new(cfg.path(), patterns)
        .with_options(cfg.options())
        .with_cancellation(cancel);

    let outcome = match cfg.trigger() {
        Some(cmd) => waiter.wait_with(|| trigger::run_shell_trigger(cmd)).await?,
        None => waiter.wait().await?,
    };

    Ok(report_outcome(outcome))
}

/// Print the outcome and map it to an exit code.
fn report_outcome(outcome: WaitOutcome<MatchResult>) -> i32 {
    match outcome {
        WaitOutcome::Matched(m) => {
            info!(result = %m.result, "matched");
            println!("{}", m.result);
            m.exit_code
        }
        WaitOutcome::TimedOut => {
            eprintln!("logwait: timed out");
            EXIT_TIMEOUT
        }
        WaitOutcome::Cancelled => {
            eprintln!("logwait: cancelled");
            EXIT_CANCELLED
        }
    }
}

/// Load the config file (explicit, or the default one if it exists) and
/// apply command-line overrides on top before validating.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let default = default_config_path();
            if default.is_file() {
                debug!(path = ?default, "using default config file");
                load_from_path(&default)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    apply_cli_overrides(&mut raw, args);
    Ok(ConfigFile::try_from(raw)?)
}

/// Scalars on the command line replace config values; patterns are appended
/// after the config's own.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(ref file) = args.file {
        raw.wait.path = Some(file.clone());
    }
    if let Some(timeout) = args.timeout {
        raw.wait.timeout = Some(format!("{}ms", timeout.as_millis()));
    }
    if let Some(interval) = args.interval {
        raw.wait.scan_interval = Some(format!("{}ms", interval.as_millis()));
    }
    if let Some(ref trigger) = args.trigger {
        raw.wait.trigger = Some(trigger.clone());
    }

    raw.pattern.extend(
        args.patterns
            .iter()
            .map(|p| PatternConfig::from_cli(PatternKind::Literal, p)),
    );
    raw.pattern.extend(
        args.regexes
            .iter()
            .map(|p| PatternConfig::from_cli(PatternKind::Regex, p)),
    );
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    let options = cfg.options();
    println!("logwait dry-run");
    println!("  path = {}", cfg.path().display());
    println!("  timeout = {:?}", options.timeout);
    println!("  scan_interval = {:?}", options.scan_interval);
    if let Some(trigger) = cfg.trigger() {
        println!("  trigger = {trigger}");
    }
    println!();

    println!("patterns ({}):", cfg.patterns().len());
    for p in cfg.patterns() {
        println!("  - {:?} ({:?}) => {}", p.text, p.kind, p.result);
        if let Some(code) = p.exit_code {
            println!("      exit_code: {code}");
        }
    }

    debug!("dry-run complete (no waiting)");
}
