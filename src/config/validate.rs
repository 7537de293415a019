//! Config validation logic.
//! Verifies the target directory and numeric settings before any file is touched.

use std::fs;
use std::path::Path;
use tracing::{error, info};

use super::types::{Config, OrganizeJob};
use crate::errors::OrganizeError;
use crate::pattern::Template;

impl Config {
    /// Validate settings that must hold before the run starts.
    pub fn validate(&self) -> Result<(), OrganizeError> {
        ensure_dir_exists_and_is_dir(&self.target_directory)?;
        if self.parallelism == 0 {
            return Err(OrganizeError::InvalidConfig(
                "parallelism must be at least 1".into(),
            ));
        }
        if self.pattern.trim().is_empty() {
            return Err(OrganizeError::InvalidConfig("pattern must not be empty".into()));
        }
        Ok(())
    }

    /// Validate and freeze this config into the job handed to the pipeline.
    /// The target directory is canonicalized so later same-file checks compare absolute paths.
    pub fn to_job(&self) -> Result<OrganizeJob, OrganizeError> {
        self.validate()?;
        let target_directory = fs::canonicalize(&self.target_directory)
            .map_err(|_| OrganizeError::TargetDirectoryMissing(self.target_directory.clone()))?;
        let template = Template::parse(&self.pattern);
        info!(
            target_dir = %target_directory.display(),
            pattern = %self.pattern,
            action = %self.action,
            parallelism = self.parallelism,
            error_mode = %self.error_mode,
            "Config validated"
        );
        Ok(OrganizeJob {
            target_directory,
            template,
            action: self.action,
            parallelism: self.parallelism,
            error_mode: self.error_mode,
        })
    }
}

/// Ensure path exists and is a directory; emit clear errors with path context.
fn ensure_dir_exists_and_is_dir(path: &Path) -> Result<(), OrganizeError> {
    if !path.is_dir() {
        error!("target directory does not exist: {}", path.display());
        return Err(OrganizeError::TargetDirectoryMissing(path.to_path_buf()));
    }
    Ok(())
}
