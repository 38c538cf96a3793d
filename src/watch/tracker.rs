// src/watch/tracker.rs

//! Position tracking: read whatever lies between a byte offset and the
//! current end of a file, one line at a time.

use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::fs::{FileSystem, ReadSeek};

/// Open `path` through `fs` and position a line reader at `offset`.
///
/// Only complete lines are yielded. A trailing piece without a `\n` is left
/// unread and [`LineRead::offset`] stays at its start, so the next read picks
/// up the whole line once the writer finishes it.
///
/// This never fails. If the file can't be opened (typically because a
/// rotation renamed or deleted it between the stat and the open), the
/// returned reader is empty and [`LineRead::vanished`] is set.
pub fn read_from(fs: &dyn FileSystem, path: &Path, offset: u64) -> LineRead {
    open_at(fs, path, offset, false)
}

/// Like [`read_from`], but for a file nobody writes to any more (a rotated
/// sibling): an unterminated last line is yielded as well.
pub fn read_finished_from(fs: &dyn FileSystem, path: &Path, offset: u64) -> LineRead {
    open_at(fs, path, offset, true)
}

fn open_at(fs: &dyn FileSystem, path: &Path, offset: u64, yield_partial: bool) -> LineRead {
    let reader = fs
        .open_shared(path)
        .and_then(|mut file| {
            file.seek(SeekFrom::Start(offset))?;
            Ok(BufReader::new(file))
        });

    let (reader, vanished) = match reader {
        Ok(reader) => (Some(reader), false),
        Err(e) => {
            debug!(?path, offset, error = %e, "could not open file for reading");
            (None, true)
        }
    };

    LineRead {
        reader,
        offset,
        vanished,
        yield_partial,
        buf: Vec::new(),
    }
}

/// Lazy, finite, single-pass sequence of lines read from a file.
///
/// The handle is held only for as long as this value lives and is dropped as
/// soon as end-of-file or a read error is reached.
pub struct LineRead {
    reader: Option<BufReader<Box<dyn ReadSeek>>>,
    offset: u64,
    vanished: bool,
    yield_partial: bool,
    buf: Vec<u8>,
}

impl LineRead {
    /// Byte offset just past the last line yielded so far. Once the iterator
    /// is exhausted this is the end of the last complete line.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// True if the file could not be opened or a read failed part-way.
    pub fn vanished(&self) -> bool {
        self.vanished
    }
}

impl std::fmt::Debug for LineRead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineRead")
            .field("offset", &self.offset)
            .field("vanished", &self.vanished)
            .field("open", &self.reader.is_some())
            .finish()
    }
}

impl Iterator for LineRead {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        self.buf.clear();

        match reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(n) if self.buf.ends_with(b"\n") || self.yield_partial => {
                self.offset += n as u64;
                Some(decode_line(&self.buf))
            }
            Ok(n) => {
                debug!(offset = self.offset, bytes = n, "holding back unterminated line");
                self.reader = None;
                None
            }
            Err(e) => {
                debug!(offset = self.offset, error = %e, "read failed mid-scan");
                self.reader = None;
                self.vanished = true;
                None
            }
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
