//! Filesystem operations: destination resolution, directory locks, retries and transfers.

mod duplicate;
mod helpers;
mod lock;
mod resolve;
mod retry;
mod transfer;

pub use duplicate::with_counter_suffix;
pub use helpers::io_error_with_help_io;
pub use lock::DirectoryLocks;
pub use resolve::{Destination, highest_directory_name, resolve_destination};
pub use retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy, is_transient};
pub use transfer::{copy_no_clobber, place, transfer};
