//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel, Action and ErrorMode are small enums with forgiving parsers.
//! - OrganizeJob is the immutable, validated view handed to the pipeline.

use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_PARALLELISM, DEFAULT_PATTERN, DEFAULT_TARGET_DIRECTORY};
use crate::pattern::Template;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// What to do with each source file once its destination is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Action {
    #[default]
    Move,
    Copy,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Some(Action::Move),
            "copy" => Some(Action::Copy),
            _ => None,
        }
    }

    /// Past-tense verb for result lines ("Moved", "Copied").
    pub fn past_tense(self) -> &'static str {
        match self {
            Action::Move => "Moved",
            Action::Copy => "Copied",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Move => "move",
            Action::Copy => "copy",
        })
    }
}

/// How per-file failures affect the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ErrorMode {
    /// Log the first failure and abort the run.
    #[default]
    Stop,
    /// Log every failure and keep going.
    Continue,
}

impl ErrorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop" => Some(ErrorMode::Stop),
            "continue" => Some(ErrorMode::Continue),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorMode::Stop => "stop",
            ErrorMode::Continue => "continue",
        })
    }
}

/// Runtime configuration used by the organizer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the organized tree
    pub target_directory: PathBuf,
    /// Destination pattern, relative to target_directory
    pub pattern: String,
    pub action: Action,
    /// Number of worker threads
    pub parallelism: usize,
    pub error_mode: ErrorMode,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_directory: PathBuf::from(DEFAULT_TARGET_DIRECTORY),
            pattern: DEFAULT_PATTERN.to_string(),
            action: Action::Move,
            parallelism: DEFAULT_PARALLELISM,
            error_mode: ErrorMode::Stop,
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}

impl Config {
    /// Construct a Config with an explicit target and pattern; other fields use defaults.
    pub fn new(target_directory: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            target_directory: target_directory.into(),
            pattern: pattern.into(),
            ..Default::default()
        }
    }
}

/// Immutable description of one organize run. Built once by `Config::to_job`.
#[derive(Debug, Clone)]
pub struct OrganizeJob {
    pub target_directory: PathBuf,
    pub template: Template,
    pub action: Action,
    pub parallelism: usize,
    pub error_mode: ErrorMode,
}
