//! Core library for `dcm_organize`.
//!
//! Moves or copies DICOM files into a tree whose layout comes from a pattern such as
//! `{PatientName}/{SeriesNumber}/{InstanceNumber ?? SOPInstanceUID}.dcm`.
//!
//! Module map:
//! - `config`: runtime settings, XML config file, validation into an `OrganizeJob`
//! - `pattern`: tag references, name sanitizing and pattern expansion
//! - `dataset`: per-file tag access and the DICOM reader
//! - `fs_ops`: destination resolution, directory locks, retries, no-clobber transfers
//! - `input`: explicit file lists or paths read from stdin
//! - `pipeline`: the concurrent organizer
pub mod cli;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod fs_ops;
pub mod input;
pub mod output;
pub mod pattern;
pub mod pipeline;

pub use config::{
    Action, Config, ErrorMode, LogLevel, OrganizeJob, default_config_path,
    path_has_symlink_ancestor,
};
pub use dataset::{DatasetReader, DicomReader, MapTagStore, TagStore};
pub use errors::{DatasetError, OrganizeError, PatternError, TagParseError};
pub use input::FileSource;
pub use pattern::{Template, apply, clean, parse_tag};
pub use pipeline::{
    CancelToken, ConsoleReporter, FileOutcome, Organizer, Reporter, RunState, RunSummary,
};
