//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - A missing file means "use defaults"; a malformed file is an error.
//!
//! Notes:
//! - This module only reads the config file; directory validation happens elsewhere.
//! - Unknown XML fields are rejected to surface misconfigurations early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Action, Config, ErrorMode, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct XmlConfig {
    #[serde(rename = "target_directory")]
    pub target_directory: Option<String>,
    #[serde(rename = "pattern")]
    pub pattern: Option<String>,
    #[serde(rename = "action")]
    pub action: Option<String>,
    #[serde(rename = "parallelism", default, deserialize_with = "de_usize_trimmed_opt")]
    pub parallelism: Option<usize>,
    #[serde(rename = "error_mode")]
    pub error_mode: Option<String>,
    #[serde(rename = "log_level")]
    pub log_level: Option<String>,
    #[serde(rename = "log_file")]
    pub log_file: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for optional usize
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid parallelism '{s}': {e}"))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl XmlConfig {
    /// Overlay the values present in the file onto `cfg`.
    pub fn apply_to(&self, cfg: &mut Config) -> Result<()> {
        if let Some(dir) = non_empty(self.target_directory.as_deref()) {
            cfg.target_directory = PathBuf::from(dir);
        }
        // Patterns may legitimately carry leading/trailing spaces inside braces; only drop blanks.
        if let Some(p) = self.pattern.as_deref()
            && !p.trim().is_empty()
        {
            cfg.pattern = p.to_string();
        }
        if let Some(a) = non_empty(self.action.as_deref()) {
            match Action::parse(a) {
                Some(action) => cfg.action = action,
                None => bail!("invalid action '{a}' (expected move or copy)"),
            }
        }
        if let Some(n) = self.parallelism {
            cfg.parallelism = n;
        }
        if let Some(m) = non_empty(self.error_mode.as_deref()) {
            match ErrorMode::parse(m) {
                Some(mode) => cfg.error_mode = mode,
                None => bail!("invalid error_mode '{m}' (expected stop or continue)"),
            }
        }
        if let Some(l) = non_empty(self.log_level.as_deref()) {
            cfg.log_level = l.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        }
        if let Some(f) = non_empty(self.log_file.as_deref()) {
            cfg.log_file = Some(PathBuf::from(f));
        }
        Ok(())
    }
}

/// Load an XmlConfig from a specific file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<XmlConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(parsed)
}

/// Read the config file from its default location, if there is one.
/// Returns Ok(None) when no file exists there.
pub fn load_config_from_xml() -> Result<Option<XmlConfig>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(None);
    }
    debug!(path = %path.display(), "loading config file");
    load_config_from_xml_path(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_only_present_fields() {
        let xml = r#"<config>
  <target_directory> /data/sorted </target_directory>
  <action>Copy</action>
  <parallelism> 3 </parallelism>
</config>"#;
        let parsed: XmlConfig = from_xml_str(xml).unwrap();
        let mut cfg = Config::default();
        parsed.apply_to(&mut cfg).unwrap();
        assert_eq!(cfg.target_directory, PathBuf::from("/data/sorted"));
        assert_eq!(cfg.action, Action::Copy);
        assert_eq!(cfg.parallelism, 3);
        assert_eq!(cfg.error_mode, ErrorMode::Stop);
        assert_eq!(cfg.pattern, Config::default().pattern);
    }

    #[test]
    fn rejects_unknown_fields() {
        let xml = "<config><download_base>/x</download_base></config>";
        assert!(from_xml_str::<XmlConfig>(xml).is_err());
    }

    #[test]
    fn rejects_bad_enum_values() {
        let parsed = XmlConfig {
            error_mode: Some("sometimes".into()),
            ..Default::default()
        };
        let mut cfg = Config::default();
        let err = parsed.apply_to(&mut cfg).unwrap_err();
        assert!(err.to_string().contains("error_mode"));
    }
}
