// src/config.rs

//! Import configuration
//!
//! Every field has a default, so an empty (or absent) config file yields
//! the layout used for Rocky Linux source imports.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Program that turns a source RPM into a cpio stream on stdout
    pub converter: String,
    /// Branch name prefix; the target version is appended
    pub branch_prefix: String,
    /// Directory receiving `*.spec` files
    pub specs_dir: String,
    /// Directory receiving every other file
    pub sources_dir: String,
    /// Ignore-list file written at the tree root
    pub ignore_file: String,
    /// Mode for files the package metadata has no entry for
    pub fallback_mode: u32,
    /// Commit author name
    pub author_name: String,
    /// Commit author email
    pub author_email: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            converter: "rpm2cpio".to_string(),
            branch_prefix: "rocky".to_string(),
            specs_dir: "SPECS".to_string(),
            sources_dir: "SOURCES".to_string(),
            ignore_file: ".gitignore".to_string(),
            fallback_mode: 0o666,
            author_name: "srpm-import".to_string(),
            author_email: "srpm-import@localhost".to_string(),
        }
    }
}

impl ImportConfig {
    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Parse config from a TOML string
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Branch name for a target distribution version
    pub fn branch_name(&self, version: u32) -> String {
        format!("{}{}", self.branch_prefix, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.converter, "rpm2cpio");
        assert_eq!(config.specs_dir, "SPECS");
        assert_eq!(config.sources_dir, "SOURCES");
        assert_eq!(config.ignore_file, ".gitignore");
        assert_eq!(config.fallback_mode, 0o666);
    }

    #[test]
    fn test_branch_name() {
        let config = ImportConfig::default();
        assert_eq!(config.branch_name(9), "rocky9");
        assert_eq!(config.branch_name(10), "rocky10");
    }

    #[test]
    fn test_partial_toml() {
        let config = ImportConfig::from_toml("branch_prefix = \"el\"\nfallback_mode = 420\n").unwrap();
        assert_eq!(config.branch_prefix, "el");
        assert_eq!(config.fallback_mode, 0o644);
        assert_eq!(config.converter, "rpm2cpio");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ImportConfig::from_toml("").unwrap(), ImportConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ImportConfig::from_toml("branch = \"x\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ImportConfig::load(Path::new("/nonexistent/srpm-import.toml"));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
