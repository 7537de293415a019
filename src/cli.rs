//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Positional FILES and `--files` are merged; when both are empty, paths are read from stdin.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::{Action, Config, ErrorMode, LogLevel};

/// Organize DICOM files into a directory tree built from their tags.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move or copy DICOM files into a directory tree derived from their tags"
)]
pub struct Args {
    /// Files to organize. When none are given, paths are read from stdin, one per line.
    #[arg(value_name = "FILES", value_hint = ValueHint::FilePath)]
    pub files_pos: Vec<PathBuf>,

    /// Files to organize (same as the positional FILES).
    #[arg(
        long = "files",
        short = 'f',
        value_name = "FILE",
        num_args = 1..,
        value_hint = ValueHint::FilePath
    )]
    pub files: Vec<PathBuf>,

    /// Root of the organized tree.
    #[arg(
        long = "directory",
        short = 'd',
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
        help = "Target directory (default: current directory)"
    )]
    pub directory: Option<PathBuf>,

    /// Destination pattern, e.g. "{PatientName}/{SeriesNumber}/{SOPInstanceUID}.dcm".
    #[arg(long, short = 'p', value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Move (default) or copy.
    #[arg(long, short = 'a', value_enum, ignore_case = true)]
    pub action: Option<Action>,

    /// Number of files processed concurrently.
    #[arg(long, value_name = "N")]
    pub parallelism: Option<usize>,

    /// What to do when a file fails: stop the run (default) or continue with the rest.
    #[arg(long, alias = "errorMode", value_enum, ignore_case = true)]
    pub error_mode: Option<ErrorMode>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where dcm_organize will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by dcm_organize and exit")]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// All files given on the command line, positional first.
    pub fn input_files(&self) -> Vec<PathBuf> {
        self.files_pos
            .iter()
            .chain(self.files.iter())
            .cloned()
            .collect()
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(dir) = &self.directory {
            cfg.target_directory = dir.clone();
        }
        if let Some(pattern) = &self.pattern {
            cfg.pattern = pattern.clone();
        }
        if let Some(action) = self.action {
            cfg.action = action;
        }
        if let Some(n) = self.parallelism {
            cfg.parallelism = n;
        }
        if let Some(mode) = self.error_mode {
            cfg.error_mode = mode;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
