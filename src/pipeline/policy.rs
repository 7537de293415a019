//! Error policy: what a per-file failure does to the rest of the run.

use tracing::{error, warn};

use super::report::Reporter;
use crate::config::ErrorMode;
use crate::errors::OrganizeError;

/// Whether workers keep pulling files after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Proceed,
    Halt,
}

#[derive(Debug, Clone, Copy)]
pub struct ErrorPolicy {
    mode: ErrorMode,
}

impl ErrorPolicy {
    pub fn new(mode: ErrorMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    /// Log and report `err`, then decide how the run continues.
    pub fn handle(&self, err: &OrganizeError, reporter: &dyn Reporter) -> Flow {
        reporter.failed(err);
        match self.mode {
            ErrorMode::Continue => {
                warn!(kind = err.kind(), error = %err, "file failed; continuing with next file");
                Flow::Proceed
            }
            ErrorMode::Stop => {
                error!(kind = err.kind(), error = %err, "file failed; stopping run");
                Flow::Halt
            }
        }
    }
}
