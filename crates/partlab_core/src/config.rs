//! Runtime settings read from the environment.
//!
//! # Invariants
//! - A missing database path means a private in-memory database.
//! - Log levels are normalised to `trace|debug|info|warn|error`.
//! - A configured log directory is always absolute.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATABASE_PATH_ENV: &str = "PARTLAB_DATABASE_PATH";
pub const LOG_LEVEL_ENV: &str = "PARTLAB_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PARTLAB_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    /// Rolling log files go here; stderr when `None`.
    pub dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn new(level: &str, dir: Option<&Path>) -> Result<Self, ConfigError> {
        let level = normalize_level(level)?;
        let dir = match dir {
            Some(path) if !path.is_absolute() => {
                return Err(ConfigError::RelativeLogDir(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => None,
        };
        Ok(Self { level, dir })
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub database_path: Option<PathBuf>,
    pub log: LogSettings,
}

impl Settings {
    /// Reads `PARTLAB_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let level = read(LOG_LEVEL_ENV);
        let log_dir = read(LOG_DIR_ENV).map(PathBuf::from);
        let log = LogSettings::new(
            level.as_deref().unwrap_or(default_log_level()),
            log_dir.as_deref(),
        )?;

        Ok(Self {
            database_path: read(DATABASE_PATH_ENV).map(PathBuf::from),
            log,
        })
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }
}

fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LogSettings, Settings, DATABASE_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_in_memory_and_default_level() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.database_path.is_none());
    }

    #[test]
    fn reads_database_path_and_normalises_level() {
        let settings = Settings::from_lookup(lookup(&[
            (DATABASE_PATH_ENV, "/var/lib/partlab/parts.db"),
            (LOG_LEVEL_ENV, " WARNING "),
        ]))
        .unwrap();
        assert_eq!(
            settings.database_path,
            Some(PathBuf::from("/var/lib/partlab/parts.db"))
        );
        assert_eq!(settings.log.level, "warn");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let settings =
            Settings::from_lookup(lookup(&[(DATABASE_PATH_ENV, "  "), (LOG_DIR_ENV, "")])).unwrap();
        assert!(settings.database_path.is_none());
        assert!(settings.log.dir.is_none());
    }

    #[test]
    fn rejects_unknown_level_and_relative_dir() {
        let err = Settings::from_lookup(lookup(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedLogLevel("loud".to_string()));

        let err = LogSettings::new("info", Some(Path::new("logs/dev"))).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));
    }
}
