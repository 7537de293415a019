//! Destination resolution.
//! - Joins the expanded relative path onto the target root.
//! - A destination equal to the source is a no-op (file already in place).
//! - Occupied destinations get a " (n)" counter, probing n = 1, 2, 3, ...
//!
//! Notes:
//! - The probe is not atomic against other processes creating files meanwhile; the
//!   transfer itself refuses to clobber and the retry policy bounds that race.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::duplicate::with_counter_suffix;
use crate::pattern::SEPARATOR;

/// Where a file should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The source already sits at its computed destination; nothing to do.
    AlreadyInPlace(PathBuf),
    /// A free path to move or copy to.
    Vacant(PathBuf),
}

impl Destination {
    pub fn path(&self) -> &Path {
        match self {
            Destination::AlreadyInPlace(p) | Destination::Vacant(p) => p,
        }
    }
}

/// Compute the final destination for `source` under `root`.
pub fn resolve_destination(root: &Path, relative: &str, source: &Path) -> Destination {
    let candidate = root.join(relative);
    // The source exists, so it can be canonicalized like the target root.
    let source_abs = fs::canonicalize(source).unwrap_or_else(|_| absolute_or_self(source));

    if absolute_or_self(&candidate) == source_abs {
        return Destination::AlreadyInPlace(candidate);
    }
    if !is_occupied(&candidate) {
        return Destination::Vacant(candidate);
    }

    let mut n: u64 = 1;
    loop {
        let next = with_counter_suffix(&candidate, n);
        if absolute_or_self(&next) == source_abs {
            return Destination::AlreadyInPlace(next);
        }
        if !is_occupied(&next) {
            trace!(dest = %next.display(), collisions = n, "resolved name collision");
            return Destination::Vacant(next);
        }
        n += 1;
    }
}

/// Lock key for a relative destination: its top-level directory, or "" for files in the root.
///
/// `sub1/sub2/file.dcm` -> `sub1`, `/sub1/file.dcm` -> `sub1`, `file.dcm` -> ``.
pub fn highest_directory_name(relative: &str) -> String {
    let is_sep = |c: char| c == SEPARATOR || c == '\\';
    let segments: Vec<&str> = relative
        .trim_matches(is_sep)
        .split(is_sep)
        .filter(|s| !s.is_empty())
        .collect();
    match segments.split_last() {
        Some((_, dirs)) => dirs.first().map(|s| s.to_string()).unwrap_or_default(),
        None => String::new(),
    }
}

/// Anything at the path counts, including dangling symlinks.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn absolute_or_self(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
