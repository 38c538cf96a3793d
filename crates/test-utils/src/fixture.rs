use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A log file inside its own temporary directory, with helpers that mimic
/// what a writer and a log rotator do to it.
pub struct LogFixture {
    dir: TempDir,
    path: PathBuf,
}

impl LogFixture {
    /// Fixture for `<tmp>/<name>`; the file itself is not created.
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(name);
        Self { dir, path }
    }

    /// Fixture whose file already exists with `content`.
    pub fn with_content(name: &str, content: &str) -> Self {
        let fixture = Self::new(name);
        fs::write(&fixture.path, content).expect("write initial log content");
        fixture
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a sibling file in the same directory.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Append `line` plus a newline, creating the file if needed.
    pub fn append_line(&self, line: &str) {
        append_line_to(&self.path, line);
    }

    /// Rename the live file to `sibling_name` and start a fresh empty one.
    pub fn rotate_to(&self, sibling_name: &str) -> PathBuf {
        let target = self.sibling(sibling_name);
        fs::rename(&self.path, &target).expect("rename log file");
        fs::File::create(&self.path).expect("recreate log file");
        target
    }

    /// Truncate the live file in place to `len` bytes.
    pub fn truncate(&self, len: u64) {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .expect("open log for truncation");
        file.set_len(len).expect("truncate log file");
    }

    /// Delete the live file and create a new one with `content`.
    pub fn recreate(&self, content: &str) {
        fs::remove_file(&self.path).expect("remove log file");
        fs::write(&self.path, content).expect("recreate log file");
    }
}

/// Append `line` plus a newline to `path`, creating it if needed.
pub fn append_line_to(path: &Path, line: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("open log for append");
    writeln!(file, "{line}").expect("append log line");
}
