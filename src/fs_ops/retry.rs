//! Bounded retry for filesystem mutations.
//!
//! Policy:
//! - Up to `max_attempts` total attempts (3 by default), no delay between them.
//! - Only transient failures are retried; permission and validation errors
//!   propagate on the first attempt.

use std::io;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// A policy with at least one attempt.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `f` until it succeeds, fails permanently, or attempts are exhausted.
    /// The last error is returned unchanged.
    pub fn run<T>(
        &self,
        op: &str,
        path: &Path,
        mut f: impl FnMut() -> io::Result<T>,
    ) -> io::Result<T> {
        let mut attempt = 1;
        loop {
            match f() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < self.max_attempts && is_transient(&e) => {
                    attempt += 1;
                    warn!(
                        op,
                        path = %path.display(),
                        error = %e,
                        "Attempt {attempt} / {}: retrying after I/O failure",
                        self.max_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether an I/O error is worth retrying.
pub fn is_transient(e: &io::Error) -> bool {
    !matches!(
        e.kind(),
        io::ErrorKind::PermissionDenied
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::InvalidData
            | io::ErrorKind::Unsupported
            | io::ErrorKind::ReadOnlyFilesystem
            | io::ErrorKind::IsADirectory
    )
}
