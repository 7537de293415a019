//! Organize pipeline.
//! A single producer feeds an unbounded queue; a fixed pool of workers pulls paths and
//! runs each file through read -> expand pattern -> resolve -> create directory -> transfer.
//!
//! Notes:
//! - Closing the queue (dropping the sender) is what ends the workers; there is no sentinel.
//! - Cancellation and the Stop error mode are both observed before and after each pull,
//!   so no new file starts once either fires. In-flight files finish or fail normally.
//! - Nothing already moved is rolled back.

mod cancel;
mod policy;
mod report;

use crossbeam_channel::{Receiver, unbounded};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use tracing::{debug, info, warn};

use crate::config::OrganizeJob;
use crate::dataset::DatasetReader;
use crate::errors::OrganizeError;
use crate::fs_ops::{
    Destination, DirectoryLocks, RetryPolicy, highest_directory_name, resolve_destination,
    transfer,
};
use crate::input::FileSource;

pub use cancel::CancelToken;
pub use policy::{ErrorPolicy, Flow};
pub use report::{ConsoleReporter, FileOutcome, Reporter};

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub state: RunState,
    /// Files moved or copied.
    pub organized: usize,
    /// Files whose destination was the file itself.
    pub already_in_place: usize,
    /// Per-file failures (only ever non-zero here in Continue mode).
    pub failed: usize,
    /// Input lines that did not name an existing file.
    pub skipped: usize,
}

/// Shared state for one run, borrowed by every worker.
#[derive(Default)]
struct RunShared {
    halted: AtomicBool,
    first_error: Mutex<Option<OrganizeError>>,
    organized: AtomicUsize,
    already_in_place: AtomicUsize,
    failed: AtomicUsize,
}

pub struct Organizer<R> {
    job: OrganizeJob,
    reader: R,
    locks: DirectoryLocks,
    retry: RetryPolicy,
    cancel: CancelToken,
}

impl<R: DatasetReader> Organizer<R> {
    pub fn new(job: OrganizeJob, reader: R) -> Self {
        Self {
            job,
            reader,
            locks: DirectoryLocks::new(),
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned token (e.g. one triggered by Ctrl-C).
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Organize every file from `source`.
    ///
    /// Returns the summary for a completed or cancelled run. In Stop mode the first
    /// per-file failure is returned as the error instead.
    pub fn run(
        &self,
        source: FileSource,
        reporter: &dyn Reporter,
    ) -> Result<RunSummary, OrganizeError> {
        let policy = ErrorPolicy::new(self.job.error_mode);
        let shared = RunShared::default();
        let workers = self.job.parallelism.max(1);
        info!(
            target_dir = %self.job.target_directory.display(),
            pattern = self.job.template.as_str(),
            action = %self.job.action,
            workers,
            error_mode = %policy.mode(),
            "Organize run started"
        );

        let stats = thread::scope(|scope| {
            let (tx, rx) = unbounded::<PathBuf>();

            let mut spawned = 0;
            for idx in 0..workers {
                let rx = rx.clone();
                let shared = &shared;
                let result = thread::Builder::new()
                    .name(format!("organize-worker-{idx}"))
                    .spawn_scoped(scope, move || self.work(&rx, shared, &policy, reporter));
                match result {
                    Ok(_) => spawned += 1,
                    Err(e) => warn!(worker = idx, error = %e, "could not start worker thread"),
                }
            }

            let stats = source.produce(
                || self.cancel.is_cancelled() || shared.halted.load(Ordering::Relaxed),
                |path| tx.send(path).is_ok(),
            );
            drop(tx);

            if spawned == 0 {
                // Degraded: drain the queue on this thread.
                self.work(&rx, &shared, &policy, reporter);
            }
            stats
        });

        let first_error = shared
            .first_error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let summary = RunSummary {
            state: if self.cancel.is_cancelled() {
                RunState::Cancelled
            } else {
                RunState::Completed
            },
            organized: shared.organized.into_inner(),
            already_in_place: shared.already_in_place.into_inner(),
            failed: shared.failed.into_inner(),
            skipped: stats.skipped,
        };
        info!(
            organized = summary.organized,
            already_in_place = summary.already_in_place,
            failed = summary.failed,
            skipped = summary.skipped,
            state = ?summary.state,
            "Organize run finished"
        );

        match first_error {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }

    /// Worker loop: pull until the queue is closed and drained, or the run stops.
    fn work(
        &self,
        rx: &Receiver<PathBuf>,
        shared: &RunShared,
        policy: &ErrorPolicy,
        reporter: &dyn Reporter,
    ) {
        let stopped = || self.cancel.is_cancelled() || shared.halted.load(Ordering::Relaxed);
        loop {
            if stopped() {
                break;
            }
            let Ok(path) = rx.recv() else {
                break;
            };
            if stopped() {
                debug!(src = %path.display(), "run stopped; file not started");
                break;
            }

            match self.organize_file(&path) {
                Ok(outcome) => {
                    let counter = match outcome {
                        FileOutcome::Transferred { .. } => &shared.organized,
                        FileOutcome::AlreadyInPlace { .. } => &shared.already_in_place,
                    };
                    counter.fetch_add(1, Ordering::Relaxed);
                    reporter.organized(&outcome);
                }
                Err(err) => {
                    shared.failed.fetch_add(1, Ordering::Relaxed);
                    if policy.handle(&err, reporter) == Flow::Halt {
                        shared.halted.store(true, Ordering::Relaxed);
                        let mut slot = shared
                            .first_error
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner);
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                    }
                }
            }
        }
    }

    /// Process one file end to end.
    pub fn organize_file(&self, path: &Path) -> Result<FileOutcome, OrganizeError> {
        let store = self
            .reader
            .read(path)
            .map_err(|source| OrganizeError::SourceFile {
                path: path.to_path_buf(),
                source,
            })?;
        let relative = self
            .job
            .template
            .apply(&store)
            .map_err(|source| OrganizeError::Pattern {
                path: path.to_path_buf(),
                source,
            })?;
        // Release the parsed file before touching the filesystem.
        drop(store);

        let dest = match resolve_destination(&self.job.target_directory, &relative, path) {
            Destination::AlreadyInPlace(dest) => {
                debug!(src = %path.display(), dest = %dest.display(), "already in place");
                return Ok(FileOutcome::AlreadyInPlace {
                    src: path.to_path_buf(),
                    dest,
                });
            }
            Destination::Vacant(dest) => dest,
        };

        if let Some(parent) = dest.parent() {
            let key = highest_directory_name(&relative);
            self.locks
                .ensure_directory(&key, parent, &self.retry)
                .map_err(|source| OrganizeError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let action = self.job.action;
        transfer(action, path, &dest, &self.retry).map_err(|source| OrganizeError::Transfer {
            action,
            src: path.to_path_buf(),
            dest: dest.clone(),
            source,
        })?;
        debug!(src = %path.display(), dest = %dest.display(), %action, "file transferred");

        Ok(FileOutcome::Transferred {
            action,
            src: path.to_path_buf(),
            dest,
        })
    }
}
