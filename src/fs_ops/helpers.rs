//! I/O helper utilities.
//!
//! Provides a small adapter to enrich io::Error with actionable context/hints while
//! preserving the original ErrorKind, so retry classification still works.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help_io("create directory", dir))?;

use std::io;
use std::path::Path;

/// Format a human-friendly message with op/path plus a hint derived from the error kind.
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    let hint = match e.kind() {
        io::ErrorKind::PermissionDenied => {
            Some("permission denied; check ownership and write permissions.")
        }
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => Some("already exists; another file took this name."),
        io::ErrorKind::CrossesDevices => Some("cross-filesystem; hard link not possible."),
        io::ErrorKind::ResourceBusy => Some("resource busy; ensure no other process is writing."),
        io::ErrorKind::StorageFull => Some("insufficient space on device."),
        io::ErrorKind::ReadOnlyFilesystem => Some("read-only filesystem; cannot write here."),
        io::ErrorKind::InvalidFilename => {
            Some("filename or path too long or invalid; shorten the pattern.")
        }
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
            Some("busy/timed out; retry after the current write finishes.")
        }
        _ => None,
    };
    if let Some(hint) = hint {
        msg.push_str(" — ");
        msg.push_str(hint);
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}

/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> io::Error
/// with enriched context in the message while preserving the original ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_kind_and_adds_context() {
        let p = Path::new("/out/a.dcm");
        let e = io_error_with_help_io("rename", p)(io::Error::from(io::ErrorKind::AlreadyExists));
        assert_eq!(e.kind(), io::ErrorKind::AlreadyExists);
        let msg = e.to_string();
        assert!(msg.contains("rename"));
        assert!(msg.contains("/out/a.dcm"));
        assert!(msg.contains("another file took this name"));
    }
}
