//! Runtime configuration: default branch name, revision numbering, log level.
//!
//! Values are injected into the builder and postprocessor rather than baked
//! into grammars, so a new log format never needs to know about them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::BranchflowError;

/// Branch name used when a log does not name one (after remapping the VCS's own token).
pub const DEFAULT_BRANCH_NAME: &str = "master";

/// Revision numbers are zero-based unless configured otherwise.
pub const DEFAULT_FIRST_REVISION: i64 = 0;

/// Remote names stripped from remote-tracking branch decorations.
pub const DEFAULT_REMOTE_NAMES: &[&str] = &["origin", "upstream"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Canonical default branch. Grammar default tokens (`master`, `default`) are remapped to it.
    pub default_branch_name: String,
    /// Revision number of a repository's root commit.
    pub first_revision: i64,
    /// `<remote>/<branch>` refs with one of these remotes are treated as `<branch>`.
    pub remote_names: Vec<String>,
    pub logging: LoggingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of error, warn, info, debug, trace.
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_branch_name: DEFAULT_BRANCH_NAME.to_string(),
            first_revision: DEFAULT_FIRST_REVISION,
            remote_names: DEFAULT_REMOTE_NAMES.iter().map(|r| r.to_string()).collect(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON config. Keys missing from the document keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, BranchflowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, BranchflowError> {
        let raw = std::fs::read_to_string(path).map_err(|e| BranchflowError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// Per-user config location: `<config_dir>/branchflow/config.json`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("branchflow").join("config.json"))
    }

    /// Resolve the effective config: explicit file, else the per-user file if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, BranchflowError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_branch_name, "master");
        assert_eq!(config.first_revision, 0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.remote_names, vec!["origin", "upstream"]);
    }

    #[test]
    fn test_remote_names_override() {
        let config = Config::from_json(r#"{ "remote_names": ["fork"] }"#).unwrap();
        assert_eq!(config.remote_names, vec!["fork"]);
        assert_eq!(config.default_branch_name, "master");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "default_branch_name": "trunk" }"#).unwrap();
        assert_eq!(config.default_branch_name, "trunk");
        assert_eq!(config.first_revision, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_nested_logging_override() {
        let config = Config::from_json(r#"{ "logging": { "level": "debug" }, "first_revision": 1 }"#).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.first_revision, 1);
        assert_eq!(config.default_branch_name, "master");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BranchflowError::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, r#"{{ "default_branch_name": "main" }}"#).unwrap();
        drop(f);

        let config = Config::resolve(Some(&path)).unwrap();
        assert_eq!(config.default_branch_name, "main");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&tmp.path().join("nope.json")).unwrap_err();
        match err {
            BranchflowError::Config { path, .. } => assert!(path.contains("nope.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
