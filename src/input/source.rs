//! Where the work items come from.
//! - An explicit list of paths (command-line arguments), forwarded as given.
//! - Otherwise lines read from a stream (stdin) until end of input; only lines naming
//!   existing files are forwarded.
//!
//! Notes:
//! - The stream is read on a detached thread feeding a channel, so a blocked read
//!   never delays cancellation; the producer polls the channel and its stop condition.

use crossbeam_channel::{RecvTimeoutError, unbounded};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::lines::ConsoleLines;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub enum FileSource {
    Paths(Vec<PathBuf>),
    Lines(Box<dyn BufRead + Send>),
}

/// Counts from one produce pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProduceStats {
    /// Items handed to the queue.
    pub forwarded: usize,
    /// Input lines that did not name an existing file.
    pub skipped: usize,
}

impl FileSource {
    /// Command-line files if any were given, else standard input.
    pub fn from_args(files: Vec<PathBuf>) -> Self {
        if files.is_empty() {
            FileSource::Lines(Box::new(BufReader::new(io::stdin())))
        } else {
            FileSource::Paths(files)
        }
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        FileSource::Lines(Box::new(reader))
    }

    /// Feed every item to `emit` until the input ends, `stop` reports true, or `emit`
    /// returns false (consumer side gone).
    pub fn produce(
        self,
        stop: impl Fn() -> bool,
        mut emit: impl FnMut(PathBuf) -> bool,
    ) -> ProduceStats {
        let mut stats = ProduceStats::default();
        match self {
            FileSource::Paths(paths) => {
                for path in paths {
                    if stop() || !emit(path) {
                        break;
                    }
                    stats.forwarded += 1;
                }
            }
            FileSource::Lines(reader) => {
                let (tx, rx) = unbounded::<io::Result<String>>();
                let spawned = thread::Builder::new()
                    .name("stdin-reader".into())
                    .spawn(move || {
                        for line in ConsoleLines::new(reader) {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                    });
                // Not joined: the reader may stay blocked on stdin after cancellation.
                if let Err(e) = spawned {
                    warn!(error = %e, "could not start input reader");
                    return stats;
                }

                loop {
                    if stop() {
                        debug!("input reading stopped");
                        break;
                    }
                    let line = match rx.recv_timeout(POLL_INTERVAL) {
                        Ok(Ok(line)) => line,
                        Ok(Err(e)) => {
                            warn!(error = %e, "failed reading input; no further paths will be read");
                            break;
                        }
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break,
                    };
                    if line.is_empty() {
                        continue;
                    }
                    let path = PathBuf::from(&line);
                    if !path.is_file() {
                        debug!(line = %line, "input line is not an existing file; skipped");
                        stats.skipped += 1;
                        continue;
                    }
                    if !emit(path) {
                        break;
                    }
                    stats.forwarded += 1;
                }
            }
        }
        stats
    }
}
