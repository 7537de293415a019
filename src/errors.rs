//! Typed error definitions for dcm_organize.
//! Per-file failures are routed through the error policy; setup failures abort the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Action;

/// A textual tag reference could not be resolved to a DICOM tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid DICOM tag '{0}'")]
pub struct TagParseError(pub String);

/// Failure while expanding a destination pattern for one file.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Failed to parse DICOM tag while applying pattern")]
    InvalidTag(#[from] TagParseError),

    #[error("DICOM tag expression '{0}' is not present in DICOM dataset")]
    NotPresent(String),

    #[error("pattern expanded to an empty path")]
    EmptyPath,
}

/// The metadata reader could not produce a tag store for a file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a recognized DICOM file: {path}")]
    NotDicom {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Target directory does not exist: {0}")]
    TargetDirectoryMissing(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not a DICOM file: {path}")]
    SourceFile {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    #[error("Failed to apply pattern to file {path}")]
    Pattern {
        path: PathBuf,
        #[source]
        source: PatternError,
    },

    #[error("Failed to create directory {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to {action} {src} --> {dest}")]
    Transfer {
        action: Action,
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrganizeError {
    /// Stable identifier used as the `kind` field in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OrganizeError::TargetDirectoryMissing(_) => "target_missing",
            OrganizeError::InvalidConfig(_) => "invalid_config",
            OrganizeError::SourceFile { .. } => "source_file",
            OrganizeError::Pattern { .. } => "pattern",
            OrganizeError::DirectoryCreation { .. } => "directory_creation",
            OrganizeError::Transfer { .. } => "transfer",
        }
    }

    /// True for failures scoped to a single file (subject to the error mode).
    pub fn is_per_file(&self) -> bool {
        !matches!(
            self,
            OrganizeError::TargetDirectoryMissing(_) | OrganizeError::InvalidConfig(_)
        )
    }
}
