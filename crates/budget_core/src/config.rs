//! Runtime configuration.
//!
//! # Responsibility
//! - Locate the database file and log directory.
//! - Load overrides from an optional TOML file.
//!
//! # Invariants
//! - Missing keys fall back to defaults.
//! - Relative paths in a config file resolve against the file's directory.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "budget";
const DB_FILE_NAME: &str = "budget.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Paths and log level used by front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            database_path: data_dir.join(DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: data_dir.join(LOG_DIR_NAME),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl BudgetConfig {
    /// Loads `path`, or returns defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolved_against(base))
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        if self.database_path.is_relative() {
            self.database_path = base.join(&self.database_path);
        }
        if self.log_dir.is_relative() {
            self.log_dir = base.join(&self.log_dir);
        }
        self
    }
}

/// Platform data directory for the app, falling back to the temp dir.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::{BudgetConfig, ConfigError};
    use std::path::Path;

    #[test]
    fn missing_keys_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.toml");
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let config = BudgetConfig::load(&path).unwrap();
        let defaults = BudgetConfig::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.database_path, defaults.database_path);
        assert_eq!(config.log_dir, defaults.log_dir);
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.toml");
        std::fs::write(
            &path,
            "database_path = \"data/budget.sqlite3\"\nlog_dir = \"/var/log/budget\"\n",
        )
        .unwrap();

        let config = BudgetConfig::load(&path).unwrap();
        assert_eq!(config.database_path, dir.path().join("data/budget.sqlite3"));
        assert_eq!(config.log_dir, Path::new("/var/log/budget"));
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            BudgetConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "log_level = [").unwrap();
        let err = BudgetConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(
            BudgetConfig::load_or_default(None).unwrap(),
            BudgetConfig::default()
        );
    }
}
