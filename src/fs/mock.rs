// src/fs/mock.rs

//! In-memory [`FileSystem`] for deterministic rotation tests.
//!
//! Every write bumps a logical clock that is guaranteed to move forward, so
//! modification times are strictly ordered regardless of the host's
//! timestamp granularity.

use super::{FileFingerprint, FileStat, FileSystem, ReadSeek};
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
struct MockFile {
    data: Vec<u8>,
    id: u64,
    created: SystemTime,
    modified: SystemTime,
    unreadable: bool,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockFile>,
    next_id: u64,
    last_tick: Option<SystemTime>,
}

impl MockState {
    fn tick(&mut self) -> SystemTime {
        let now = SystemTime::now();
        let t = match self.last_tick {
            Some(last) if now <= last => last + Duration::from_micros(1),
            _ => now,
        };
        self.last_tick = Some(t);
        t
    }

    fn new_file(&mut self, data: Vec<u8>) -> MockFile {
        let now = self.tick();
        self.next_id += 1;
        MockFile {
            data,
            id: self.next_id,
            created: now,
            modified: now,
            unreadable: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create (or replace with a brand new file instance) `path`.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state();
        let file = state.new_file(content.into());
        state.files.insert(path.as_ref().to_path_buf(), file);
    }

    /// Append to `path` in place, creating it if missing.
    pub fn append(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let mut state = self.state();
        let now = state.tick();
        let path = path.as_ref().to_path_buf();
        if !state.files.contains_key(&path) {
            let file = state.new_file(Vec::new());
            state.files.insert(path.clone(), file);
        }
        if let Some(file) = state.files.get_mut(&path) {
            file.data.extend_from_slice(content.as_ref());
            file.modified = now;
        }
    }

    /// Convenience: append `line` followed by `\n`.
    pub fn append_line(&self, path: impl AsRef<Path>, line: &str) {
        self.append(path, format!("{line}\n"));
    }

    /// Truncate in place; the file keeps its identity.
    pub fn truncate(&self, path: impl AsRef<Path>, len: usize) {
        let mut state = self.state();
        let now = state.tick();
        if let Some(file) = state.files.get_mut(path.as_ref()) {
            file.data.truncate(len);
            file.modified = now;
        }
    }

    /// Move a file instance to a new name. Like `rename(2)`, this keeps the
    /// modification time and identity and replaces any existing target.
    pub fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) {
        let mut state = self.state();
        if let Some(file) = state.files.remove(from.as_ref()) {
            state.files.insert(to.as_ref().to_path_buf(), file);
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.state().files.remove(path.as_ref());
    }

    /// Make `open_shared` fail for `path` until cleared, simulating a
    /// transient read failure.
    pub fn set_unreadable(&self, path: impl AsRef<Path>, unreadable: bool) {
        if let Some(file) = self.state().files.get_mut(path.as_ref()) {
            file.unreadable = unreadable;
        }
    }
}

impl FileSystem for MockFileSystem {
    fn stat(&self, path: &Path) -> io::Result<Option<FileStat>> {
        let state = self.state();
        Ok(state.files.get(path).map(|file| FileStat {
            len: file.data.len() as u64,
            modified: file.modified,
            fingerprint: FileFingerprint::new(Some(file.created), Some((0, file.id))),
        }))
    }

    fn open_shared(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        let state = self.state();
        match state.files.get(path) {
            Some(file) if file.unreadable => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock: {path:?} is unreadable"),
            )),
            Some(file) => Ok(Box::new(Cursor::new(file.data.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock: file not found: {path:?}"),
            )),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state();
        let entries: Vec<PathBuf> = state
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock: not a directory or empty: {path:?}"),
            ));
        }
        Ok(entries)
    }
}
