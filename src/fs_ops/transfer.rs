//! No-clobber move and copy.
//! - Placing a file claims the destination name atomically: a hard link for moves, a
//!   `create_new` destination for copies. A name taken by another worker surfaces as
//!   `AlreadyExists` and nothing is overwritten.
//! - Move: hard link then remove the source. Across filesystems, or where links are
//!   refused, the source is copied instead.
//! - Placing and removing the source are retried separately, so a failed removal never
//!   re-places the file. If the removal keeps failing the new name is removed again and
//!   the source is left as it was.
//! - Unix: best-effort fsync of the destination directory after a link.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

use super::helpers::io_error_with_help_io;
use super::retry::RetryPolicy;
use crate::config::Action;

const BUF_SIZE: usize = 1024 * 1024; // 1 MiB buffers

/// Perform `action` from `src` to `dest` without overwriting anything at `dest`.
/// Each step runs under `retry`.
pub fn transfer(action: Action, src: &Path, dest: &Path, retry: &RetryPolicy) -> io::Result<()> {
    retry.run(&action.to_string(), dest, || place(action, src, dest))?;
    if let Action::Move = action
        && let Err(e) = retry.run("remove original file", src, || remove_original(src))
    {
        // Undo the placement; `src` still holds the data.
        if let Err(undo) = fs::remove_file(dest) {
            warn!(dest = %dest.display(), error = %undo, "could not remove placed file after failed move");
        }
        return Err(e);
    }
    Ok(())
}

/// Put a new name for `src` at `dest`, failing with `AlreadyExists` if `dest` is taken.
pub fn place(action: Action, src: &Path, dest: &Path) -> io::Result<()> {
    match action {
        Action::Move => link_no_clobber(src, dest),
        Action::Copy => copy_no_clobber(src, dest).map(|_| ()),
    }
}

fn link_no_clobber(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::hard_link(src, dest) {
        Ok(()) => {
            if let Some(parent) = dest.parent() {
                // Ignore fsync errors to avoid turning a successful link into a failure.
                let _ = fsync_dir(parent);
            }
            Ok(())
        }
        // EPERM: some filesystems refuse links, as does Linux for files the caller does not own.
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::CrossesDevices
                    | io::ErrorKind::Unsupported
                    | io::ErrorKind::PermissionDenied
            ) =>
        {
            debug!(src = %src.display(), dest = %dest.display(), error = %e, "cannot link; copying instead");
            copy_no_clobber(src, dest).map(|_| ())
        }
        Err(e) => Err(io_error_with_help_io("link", dest)(e)),
    }
}

fn remove_original(src: &Path) -> io::Result<()> {
    fs::remove_file(src).map_err(io_error_with_help_io("remove original file", src))
}

/// Copy `src` -> `dest` using buffered I/O, then fsync the destination.
/// Returns the number of bytes written.
pub fn copy_no_clobber(src: &Path, dest: &Path) -> io::Result<u64> {
    let input = File::open(src).map_err(io_error_with_help_io("open source", src))?;
    let output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(io_error_with_help_io("create destination", dest))?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, input);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, output);
    let copied = io::copy(&mut reader, &mut writer).and_then(|bytes| {
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(bytes)
    });

    match copied {
        Ok(bytes) => {
            drop(writer);
            // Permissions follow the source like fs::copy does; best-effort.
            if let Ok(meta) = fs::metadata(src) {
                let _ = fs::set_permissions(dest, meta.permissions());
            }
            Ok(bytes)
        }
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(dest);
            Err(io_error_with_help_io("copy", dest)(e))
        }
    }
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
