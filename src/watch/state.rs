// src/watch/state.rs

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::fs::{FileFingerprint, FileStat};

/// Per-wait scan state, owned by the poll loop and dropped when the wait
/// returns.
#[derive(Debug, Clone)]
pub struct WatchState {
    path: PathBuf,
    /// Bytes of the current file instance already scanned.
    pub read_offset: u64,
    /// Identity of the file instance `read_offset` refers to.
    pub fingerprint: Option<FileFingerprint>,
    /// Siblings last written at or before this instant were already handled.
    pub rotation_watermark: SystemTime,
    /// A rotation was seen but the live file has not been rescanned yet.
    pub pending_rotation: bool,
}

impl WatchState {
    /// Start from the end of the file if it exists, so only content written
    /// from now on is considered.
    pub fn new(path: impl Into<PathBuf>, existing: Option<&FileStat>, now: SystemTime) -> Self {
        Self {
            path: path.into(),
            read_offset: existing.map_or(0, |s| s.len),
            fingerprint: existing.map(|s| s.fingerprint),
            rotation_watermark: now,
            pending_rotation: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
