//! Keyed directory-creation locks.
//!
//! Design:
//! - One mutex per lock key (the top-level directory of a destination), created lazily.
//! - The table itself sits behind a short-lived mutex taken only to get-or-insert.
//! - Entries live as long as the table; the key set is small (one per top-level group).
//!
//! Callers typically use `ensure_directory(key, dir, retry)`, which re-checks existence
//! inside the critical section so concurrent workers never race on `create_dir_all`.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, trace};

use super::helpers::io_error_with_help_io;
use super::retry::RetryPolicy;

#[derive(Debug, Default)]
pub struct DirectoryLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DirectoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Arc<Mutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(table.entry(key.to_owned()).or_default())
    }

    /// Run `f` while holding the lock for `key`. Different keys never block each other.
    pub fn with_lock<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let mutex = self.entry(key);
        let start = Instant::now();
        let _guard = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        trace!(key, waited_ms = start.elapsed().as_millis() as u64, "directory lock acquired");
        f()
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create `dir` (and parents) unless it already exists, serialized per `key`.
    /// Returns true if this call created it.
    pub fn ensure_directory(&self, key: &str, dir: &Path, retry: &RetryPolicy) -> io::Result<bool> {
        if dir.is_dir() {
            return Ok(false);
        }
        self.with_lock(key, || {
            if dir.is_dir() {
                return Ok(false);
            }
            retry.run("create directory", dir, || {
                fs::create_dir_all(dir).map_err(io_error_with_help_io("create directory", dir))
            })?;
            debug!(key, dir = %dir.display(), "created directory");
            Ok(true)
        })
    }
}
