//! Duplicate-name helpers.
//!
//! Collisions are resolved by inserting " (n)" before the extension:
//! - "image.dcm" -> "image (1).dcm", "image (2).dcm", ...
//! - ".env" -> ".env (1)"
//! - "archive.tar.gz" -> "archive.tar (1).gz"
//!
//! Notes:
//! - This only builds names; the resolver decides which counter is free.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// `candidate` with " (n)" inserted before its extension.
pub fn with_counter_suffix(candidate: &Path, n: u64) -> PathBuf {
    let name = candidate.file_name().unwrap_or_else(|| OsStr::new("file"));
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from(name));
    let ext = base.extension();
    candidate.with_file_name(build_name_with_suffix(&stem, ext, &format!(" ({n})")))
}

// Conservative filename limits (bytes/characters, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240; // leave headroom for legacy MAX_PATH
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255; // typical POSIX/EXT limits

/// Measure the approximate length of an OsStr for filename budgeting.
#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// Truncate the stem if needed so `stem + suffix + ["." + ext]` fits within MAX_FILENAME_LEN.
fn build_name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let mut overhead = name_len_units(OsStr::new(suffix));
    let mut ext_part = OsString::new();
    if let Some(e) = ext {
        overhead = overhead.saturating_add(1 + name_len_units(e)); // dot + ext
        ext_part.push(".");
        ext_part.push(e);
    }

    let mut stem_os = stem.to_os_string();
    if name_len_units(&stem_os) + overhead > MAX_FILENAME_LEN {
        let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
        // Lossy for non-UTF-8 stems; such names are rare in generated paths.
        let lossy = stem.to_string_lossy();
        let mut acc = String::new();
        for ch in lossy.chars() {
            acc.push(ch);
            if name_len_units(OsStr::new(&acc)) > budget {
                acc.pop();
                break;
            }
        }
        if acc.is_empty() {
            acc.push('f');
        }
        stem_os = OsString::from(acc);
    }

    let mut new_name = stem_os;
    new_name.push(suffix);
    new_name.push(&ext_part);
    new_name
}
