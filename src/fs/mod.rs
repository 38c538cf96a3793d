// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub mod mock;

/// Opaque identity of one file instance.
///
/// Two stats of the same path compare equal as long as the underlying file
/// object is the same one (appends don't change it). A delete + recreate or a
/// rename-over produces a different fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileFingerprint {
    created: Option<SystemTime>,
    /// `(dev, ino)` on Unix, absent elsewhere.
    node: Option<(u64, u64)>,
}

impl FileFingerprint {
    pub fn new(created: Option<SystemTime>, node: Option<(u64, u64)>) -> Self {
        Self { created, node }
    }

    fn from_metadata(metadata: &fs::Metadata) -> Self {
        Self {
            created: metadata.created().ok(),
            node: node_id(metadata),
        }
    }
}

#[cfg(unix)]
fn node_id(metadata: &fs::Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn node_id(_metadata: &fs::Metadata) -> Option<(u64, u64)> {
    None
}

/// The subset of file metadata the poll loop looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub len: u64,
    pub modified: SystemTime,
    pub fingerprint: FileFingerprint,
}

/// Readable + seekable handle returned by [`FileSystem::open_shared`].
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Abstract filesystem interface.
///
/// Methods return `io::Result` rather than `anyhow` so callers can tell a
/// vanished file (`NotFound`) apart from other failures.
pub trait FileSystem: Send + Sync + Debug {
    /// Stat a regular file. `Ok(None)` if nothing exists at `path`.
    fn stat(&self, path: &Path) -> io::Result<Option<FileStat>>;

    /// Open for reading without excluding writers, renames or deletes.
    fn open_shared(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>>;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn stat(&self, path: &Path) -> io::Result<Option<FileStat>> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            return Ok(None);
        }
        Ok(Some(FileStat {
            len: metadata.len(),
            modified: metadata.modified()?,
            fingerprint: FileFingerprint::from_metadata(&metadata),
        }))
    }

    fn open_shared(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        let file = shared_read_options().open(path)?;
        Ok(Box::new(file))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}

#[cfg(windows)]
fn shared_read_options() -> fs::OpenOptions {
    use std::os::windows::fs::OpenOptionsExt;

    // FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE
    const SHARE_ALL: u32 = 0x1 | 0x2 | 0x4;

    let mut options = fs::OpenOptions::new();
    options.read(true).share_mode(SHARE_ALL);
    options
}

#[cfg(not(windows))]
fn shared_read_options() -> fs::OpenOptions {
    // Unix never locks a file against writers, renames or unlinks on open.
    let mut options = fs::OpenOptions::new();
    options.read(true);
    options
}
