// src/watch/poll.rs

//! The poll loop: a small synchronous core ([`PollLoop::poll_once`]) that
//! performs exactly one scan, wrapped by an async driver
//! ([`PollLoop::run`]) that owns sleeping, the timeout and cancellation.
//!
//! The core does no sleeping and keeps no clock, so it can be stepped by
//! tests one iteration at a time.

use std::time::{Duration, SystemTime};

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::fs::{FileStat, FileSystem};
use crate::types::WaitOutcome;
use crate::watch::matcher::PatternTable;
use crate::watch::rotation::{classify, find_renamed_predecessor, find_rotated_sibling};
use crate::watch::state::WatchState;
use crate::watch::tracker::{read_finished_from, read_from};

/// Result of a single poll iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<V> {
    /// Nothing matched (yet); keep polling.
    Continue,
    /// A line matched; the wait is over.
    Matched(V),
}

/// Scan state plus the collaborators needed to advance it.
pub struct PollLoop<'a, V> {
    fs: &'a dyn FileSystem,
    patterns: &'a PatternTable<V>,
    state: WatchState,
}

impl<V> std::fmt::Debug for PollLoop<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollLoop")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, V: Clone> PollLoop<'a, V> {
    /// Initialise scan state for `path`.
    ///
    /// If the file already exists, scanning starts at its current end so that
    /// only content produced after this call is considered.
    pub fn new(
        fs: &'a dyn FileSystem,
        path: impl Into<std::path::PathBuf>,
        patterns: &'a PatternTable<V>,
    ) -> Self {
        let path = path.into();
        let existing = stat_or_absent(fs, &path);
        let state = WatchState::new(path, existing.as_ref(), SystemTime::now());
        debug!(
            path = ?state.path(),
            exists = existing.is_some(),
            offset = state.read_offset,
            "initialised watch state"
        );
        Self {
            fs,
            patterns,
            state,
        }
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Perform one scan of the watched file (and, after a rotation, of its
    /// newest rotated sibling).
    pub fn poll_once(&mut self) -> Transition<V> {
        let Some(stat) = stat_or_absent(self.fs, self.state.path()) else {
            debug!(path = ?self.state.path(), "file absent; waiting for it to (re)appear");
            return Transition::Continue;
        };

        let rotation = classify(self.state.fingerprint.as_ref(), self.state.read_offset, &stat);
        if rotation.is_rotation() {
            info!(
                path = ?self.state.path(),
                ?rotation,
                previous_offset = self.state.read_offset,
                len = stat.len,
                "rotation detected"
            );
            self.state.pending_rotation = true;
        }

        if stat.len == self.state.read_offset && !self.state.pending_rotation {
            return Transition::Continue;
        }

        if self.state.pending_rotation {
            if let Some(hit) = self.scan_rotated_sibling() {
                return Transition::Matched(hit);
            }
        }

        if self.state.pending_rotation {
            debug!("no rotated sibling consumed; rescanning live file from start");
            self.state.read_offset = 0;
            self.state.pending_rotation = false;
        }

        let mut lines = read_from(self.fs, self.state.path(), self.state.read_offset);
        if let Some(hit) = self.patterns.scan(&mut lines) {
            info!(path = ?self.state.path(), "pattern matched in live file");
            return Transition::Matched(hit.clone());
        }

        if lines.vanished() {
            debug!(
                path = ?self.state.path(),
                offset = lines.offset(),
                "live file vanished mid-read; treating as rotation in progress"
            );
        }
        self.state.read_offset = lines.offset();
        self.state.fingerprint = Some(stat.fingerprint);
        Transition::Continue
    }

    /// Look for the file we were reading under its rotated name, else the
    /// newest sibling written since the watermark, and scan it from the
    /// pre-rotation offset. On a miss the sibling counts as consumed.
    fn scan_rotated_sibling(&mut self) -> Option<V> {
        let renamed = self
            .state
            .fingerprint
            .as_ref()
            .and_then(|fp| find_renamed_predecessor(self.fs, self.state.path(), fp));
        let sibling = match renamed {
            Some(sibling) => sibling,
            None => {
                find_rotated_sibling(self.fs, self.state.path(), self.state.rotation_watermark)?
            }
        };

        debug!(
            sibling = ?sibling.path,
            offset = self.state.read_offset,
            "scanning rotated sibling"
        );
        let mut lines = read_finished_from(self.fs, &sibling.path, self.state.read_offset);
        if let Some(hit) = self.patterns.scan(&mut lines) {
            info!(sibling = ?sibling.path, "pattern matched in rotated sibling");
            return Some(hit.clone());
        }

        self.state.rotation_watermark = self.state.rotation_watermark.max(sibling.modified);
        self.state.read_offset = 0;
        self.state.pending_rotation = false;
        None
    }

    /// Poll every `interval` until a match, `timeout`, or cancellation.
    pub async fn run(
        mut self,
        timeout: Duration,
        interval: Duration,
        cancel: Option<&CancellationToken>,
    ) -> WaitOutcome<V> {
        let started = Instant::now();

        loop {
            if started.elapsed() >= timeout {
                info!(path = ?self.state.path(), ?timeout, "timed out waiting for a match");
                return WaitOutcome::TimedOut;
            }

            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => {
                            info!(path = ?self.state.path(), "wait cancelled");
                            return WaitOutcome::Cancelled;
                        }
                        _ = sleep(interval) => {}
                    }
                }
                None => sleep(interval).await,
            }

            if let Transition::Matched(v) = self.poll_once() {
                return WaitOutcome::Matched(v);
            }
        }
    }
}

/// Stat `path`, folding "missing" and transient stat errors into `None`.
fn stat_or_absent(fs: &dyn FileSystem, path: &std::path::Path) -> Option<FileStat> {
    match fs.stat(path) {
        Ok(stat) => stat,
        Err(e) => {
            debug!(?path, error = %e, "stat failed; treating file as absent");
            None
        }
    }
}
