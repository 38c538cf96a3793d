// src/waiter.rs

//! Public wait API.
//!
//! A wait is: validate the request, record where the file currently ends,
//! run the trigger once, then poll until a pattern matches or time runs out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::errors::{LogwaitError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::WaitOutcome;
use crate::watch::matcher::PatternTable;
use crate::watch::poll::PollLoop;

/// Default maximum wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Default delay between polls.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(500);

/// Timing knobs for a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub scan_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            scan_interval: DEFAULT_SCAN_INTERVAL,
        }
    }
}

impl WaitOptions {
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(LogwaitError::ConfigError(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.scan_interval.is_zero() {
            return Err(LogwaitError::ConfigError(
                "scan interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Waits for one of a set of patterns to show up in a (possibly rotating)
/// log file.
///
/// ```no_run
/// # async fn demo() -> logwait::errors::Result<()> {
/// use logwait::{LogWaiter, PatternTable, WaitOutcome};
///
/// let patterns = PatternTable::new()
///     .literal("Completed", "ok")?
///     .literal("Not required", "skipped")?;
///
/// let outcome = LogWaiter::new("/var/log/app.log", patterns)
///     .wait_with(|| Ok(()))
///     .await?;
///
/// if let WaitOutcome::Matched(result) = outcome {
///     println!("{result}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct LogWaiter<V> {
    path: PathBuf,
    patterns: PatternTable<V>,
    options: WaitOptions,
    fs: Arc<dyn FileSystem>,
    cancel: Option<CancellationToken>,
}

impl<V> std::fmt::Debug for LogWaiter<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogWaiter")
            .field("path", &self.path)
            .field("patterns", &self.patterns)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<V: Clone> LogWaiter<V> {
    pub fn new(path: impl Into<PathBuf>, patterns: PatternTable<V>) -> Self {
        Self {
            path: path.into(),
            patterns,
            options: WaitOptions::default(),
            fs: Arc::new(RealFileSystem),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: WaitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn scan_interval(mut self, interval: Duration) -> Self {
        self.options.scan_interval = interval;
        self
    }

    /// Swap the filesystem backend (used by tests with `MockFileSystem`).
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// End the wait early with [`WaitOutcome::Cancelled`] when `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.patterns.is_empty() {
            return Err(LogwaitError::ConfigError(
                "at least one pattern is required".to_string(),
            ));
        }
        self.options.validate()
    }

    /// Wait without a trigger action.
    pub async fn wait(self) -> Result<WaitOutcome<V>> {
        self.wait_with(|| Ok(())).await
    }

    /// Run `trigger` exactly once, right after the starting offset has been
    /// recorded, then poll.
    ///
    /// Configuration mistakes are reported before `trigger` runs. A failing
    /// trigger ends the wait with [`LogwaitError::Trigger`].
    pub async fn wait_with<F>(self, trigger: F) -> Result<WaitOutcome<V>>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        self.validate()?;

        info!(
            path = ?self.path,
            patterns = self.patterns.len(),
            timeout = ?self.options.timeout,
            interval = ?self.options.scan_interval,
            "waiting for log content"
        );

        let poller = PollLoop::new(self.fs.as_ref(), self.path.clone(), &self.patterns);

        trigger().map_err(LogwaitError::Trigger)?;

        let outcome = poller
            .run(
                self.options.timeout,
                self.options.scan_interval,
                self.cancel.as_ref(),
            )
            .await;
        Ok(outcome)
    }

    /// Blocking form of [`wait`](Self::wait).
    pub fn wait_blocking(self) -> Result<WaitOutcome<V>> {
        self.wait_blocking_with(|| Ok(()))
    }

    /// Blocking form of [`wait_with`](Self::wait_with) for callers that are
    /// not inside an async runtime.
    ///
    /// Must not be called from within a Tokio runtime.
    pub fn wait_blocking_with<F>(self, trigger: F) -> Result<WaitOutcome<V>>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        runtime.block_on(self.wait_with(trigger))
    }
}

/// Functional form of [`LogWaiter`]: wait for `patterns` in `path`, running
/// `trigger` (if any) exactly once before polling starts.
pub async fn wait_for_content<V, F>(
    path: impl Into<PathBuf>,
    patterns: PatternTable<V>,
    options: WaitOptions,
    trigger: Option<F>,
) -> Result<WaitOutcome<V>>
where
    V: Clone,
    F: FnOnce() -> anyhow::Result<()>,
{
    let waiter = LogWaiter::new(path, patterns).with_options(options);
    match trigger {
        Some(trigger) => waiter.wait_with(trigger).await,
        None => waiter.wait().await,
    }
}
