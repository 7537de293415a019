//! Per-file result sink.

use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::config::Action;
use crate::errors::OrganizeError;
use crate::output as out;

/// What happened to one successfully handled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Transferred {
        action: Action,
        src: PathBuf,
        dest: PathBuf,
    },
    /// The computed destination is the source itself.
    AlreadyInPlace { src: PathBuf, dest: PathBuf },
}

impl FileOutcome {
    pub fn dest(&self) -> &PathBuf {
        match self {
            FileOutcome::Transferred { dest, .. } | FileOutcome::AlreadyInPlace { dest, .. } => {
                dest
            }
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Transferred { action, src, dest } => write!(
                f,
                "{} {} --> {}",
                action.past_tense(),
                src.display(),
                dest.display()
            ),
            FileOutcome::AlreadyInPlace { src, dest } => {
                write!(f, "OK: {} === {}", src.display(), dest.display())
            }
        }
    }
}

/// Receives results from all workers concurrently.
pub trait Reporter: Send + Sync {
    fn organized(&self, outcome: &FileOutcome);
    fn failed(&self, error: &OrganizeError);
}

/// Prints result lines for users: successes on stdout, failures on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn organized(&self, outcome: &FileOutcome) {
        debug!(dest = %outcome.dest().display(), "file organized");
        out::print_user(&outcome.to_string());
    }

    fn failed(&self, error: &OrganizeError) {
        out::print_error(&out::error_chain(error));
    }
}
