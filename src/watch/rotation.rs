// src/watch/rotation.rs

//! Rotation detection.
//!
//! Two questions are answered here:
//! - did the watched file get rotated since the last poll ([`classify`])?
//! - if so, is there a rotated sibling holding lines we haven't seen yet?
//!   Either the old file itself, renamed ([`find_renamed_predecessor`]), or
//!   failing that the newest sibling written since the watermark
//!   ([`find_rotated_sibling`]).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::fs::{FileFingerprint, FileStat, FileSystem};

/// What happened to the watched file between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Same file object, nothing lost: at most appended to.
    None,
    /// Same file object, but shorter than what we already consumed.
    Truncated,
    /// A different file object now lives at the path.
    Replaced,
}

impl Rotation {
    pub fn is_rotation(self) -> bool {
        !matches!(self, Rotation::None)
    }
}

/// Classify the current state of the file against what we saw last time.
///
/// `previous` is `None` when the file did not exist when we last looked; its
/// first appearance counts as a replacement.
pub fn classify(
    previous: Option<&FileFingerprint>,
    previous_offset: u64,
    current: &FileStat,
) -> Rotation {
    match previous {
        Some(fp) if *fp == current.fingerprint => {
            if current.len < previous_offset {
                Rotation::Truncated
            } else {
                Rotation::None
            }
        }
        _ => Rotation::Replaced,
    }
}

/// A rotated sibling chosen for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedSibling {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Glob matching rotated siblings of `path`, applied to file names only.
///
/// A wildcard segment is inserted before the extension:
/// `app.log` -> `app*.log`, `app` -> `app*`.
pub fn sibling_matcher(path: &Path) -> Result<GlobMatcher> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no usable file name in {:?}", path))?;

    let pattern = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}*.{}", globset::escape(stem), globset::escape(ext)),
        None => format!("{}*", globset::escape(stem)),
    };

    let glob = GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid sibling glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Rotated siblings of `path` that can currently be stat'ed. The live file
/// itself is never included. Any IO problem while looking simply means
/// "no candidates".
fn sibling_candidates(fs: &dyn FileSystem, path: &Path) -> Vec<(PathBuf, FileStat)> {
    let matcher = match sibling_matcher(path) {
        Ok(m) => m,
        Err(e) => {
            debug!(?path, error = %e, "cannot build sibling pattern");
            return Vec::new();
        }
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let entries = match fs.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(?dir, error = %e, "cannot list directory for rotated siblings");
            return Vec::new();
        }
    };

    let live_name = path.file_name();
    entries
        .into_iter()
        .filter(|entry| match entry.file_name() {
            Some(name) => Some(name) != live_name && matcher.is_match(Path::new(name)),
            None => false,
        })
        .filter_map(|entry| match fs.stat(&entry) {
            Ok(Some(stat)) => Some((entry, stat)),
            _ => None,
        })
        .collect()
}

/// Find the sibling that *is* the file we were reading, moved aside by a
/// rename. Matching on identity works even when the filesystem clock is too
/// coarse to order the rotation after the watermark.
pub fn find_renamed_predecessor(
    fs: &dyn FileSystem,
    path: &Path,
    predecessor: &FileFingerprint,
) -> Option<RotatedSibling> {
    let found = sibling_candidates(fs, path)
        .into_iter()
        .find(|(_, stat)| stat.fingerprint == *predecessor)
        .map(|(path, stat)| RotatedSibling {
            path,
            modified: stat.modified,
        });

    if let Some(ref sibling) = found {
        debug!(path = ?sibling.path, "found renamed predecessor of live file");
    }
    found
}

/// Find the rotated sibling of `path` last written strictly after
/// `watermark`.
///
/// If several qualify, the most recently modified one wins; equal times are
/// broken by the greatest file name. The live file itself is never returned.
pub fn find_rotated_sibling(
    fs: &dyn FileSystem,
    path: &Path,
    watermark: SystemTime,
) -> Option<RotatedSibling> {
    let best = sibling_candidates(fs, path)
        .into_iter()
        .filter(|(_, stat)| stat.modified > watermark)
        .max_by(|(a_path, a), (b_path, b)| {
            (a.modified, a_path.file_name()).cmp(&(b.modified, b_path.file_name()))
        })
        .map(|(path, stat)| RotatedSibling {
            path,
            modified: stat.modified,
        });

    if let Some(ref sibling) = best {
        debug!(path = ?sibling.path, "found rotated sibling newer than watermark");
    }
    best
}
