//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Action, Config, ErrorMode, LogLevel, OrganizeJob};
pub use xml::{XmlConfig, load_config_from_xml};

pub const DEFAULT_TARGET_DIRECTORY: &str = ".";
pub const DEFAULT_PATTERN: &str =
    "{PatientName}/{AccessionNumber}/{SeriesNumber}/{InstanceNumber ?? SOPInstanceUID} - {Guid}.dcm";
pub const DEFAULT_PARALLELISM: usize = 8;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DCM_ORGANIZE_CONFIG";
