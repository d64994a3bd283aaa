//! Classifier Configuration
//!
//! Overrides and platform signals read once when the classifier is built.
//! Can be loaded from JSON:
//!
//! ```json
//! { "overrides": { "force_low_end": true }, "os_version": 21 }
//! ```

use crate::os::OsVersion;
use crate::overrides::Overrides;
use fos_memory::{default_source, MemoryReportSource, ProcMeminfo};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid classifier config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inputs to the device tier decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Forced classification switches
    pub overrides: Overrides,

    /// Platform API level. `None` on platforms without one, in which
    /// case the legacy-OS rule does not apply.
    pub os_version: Option<OsVersion>,

    /// Memory report to read instead of the platform default
    pub meminfo_path: Option<PathBuf>,
}

impl ClassifierConfig {
    pub fn new(overrides: Overrides, os_version: Option<OsVersion>) -> Self {
        Self {
            overrides,
            os_version,
            meminfo_path: None,
        }
    }

    /// Read the memory report from `path`.
    pub fn with_meminfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.meminfo_path = Some(path.into());
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The memory source this configuration selects.
    pub fn memory_source(&self) -> Box<dyn MemoryReportSource> {
        match &self.meminfo_path {
            Some(path) => Box::new(ProcMeminfo::new(path)),
            None => default_source(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.overrides, Overrides::none());
        assert_eq!(config.os_version, None);
        assert!(config.meminfo_path.is_none());
    }

    #[test]
    fn test_from_json_str() {
        let config = ClassifierConfig::from_json_str(
            r#"{ "overrides": { "force_low_end": true }, "os_version": 21 }"#,
        )
        .unwrap();

        assert!(config.overrides.force_low_end);
        assert!(!config.overrides.force_not_low_end);
        assert_eq!(config.os_version, Some(OsVersion(21)));

        let empty = ClassifierConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, ClassifierConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        let err = ClassifierConfig::from_json_str(r#"{ "os_version": "new" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "meminfo_path": "/tmp/meminfo" }}"#).unwrap();

        let config = ClassifierConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.meminfo_path, Some(PathBuf::from("/tmp/meminfo")));

        let err = ClassifierConfig::from_json_file("/nonexistent/fos/device.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
