//! Core runtime configuration.
//!
//! # Responsibility
//! - Resolve where the key-value database and log files live.
//! - Hold the log level and store busy timeout.
//!
//! # Invariants
//! - `data_dir` is never empty.
//! - `log_level` is always one of `trace|debug|info|warn|error`.

use crate::db::{DbError, DEFAULT_BUSY_TIMEOUT};
use crate::logging::{default_log_level, normalize_level};
use crate::store::SqliteKvStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "POCKETNOTE_DATA_DIR";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "POCKETNOTE_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "pocketnote.sqlite3";
const LOG_SUBDIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    EmptyDataDir,
    InvalidLogLevel(String),
    CreateDataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataDir => write!(f, "data directory cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::CreateDataDir { path, source } => write!(
                f,
                "failed to create data directory `{}`: {source}",
                path.display()
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDataDir { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::EmptyDataDir | Self::InvalidLogLevel(_) => None,
        }
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log_level: &'static str,
    pub busy_timeout: Duration,
}

impl CoreConfig {
    /// Builds a config rooted at `data_dir` with build-mode defaults.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        if data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(Self {
            data_dir,
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        })
    }

    /// Builds a config from process environment, falling back to `default_dir`.
    pub fn from_env(default_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_lookup(default_dir, |name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(
        default_dir: impl Into<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = lookup(DATA_DIR_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_dir.into());
        let config = Self::new(data_dir)?;
        match lookup(LOG_LEVEL_ENV) {
            Some(level) if !level.trim().is_empty() => config.with_log_level(&level),
            _ => Ok(config),
        }
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(self)
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_SUBDIR)
    }

    /// Creates the data directory if needed and opens the SQLite store.
    pub fn open_store(&self) -> Result<SqliteKvStore, ConfigError> {
        ensure_dir(&self.data_dir)?;
        Ok(SqliteKvStore::open(self.db_path(), self.busy_timeout)?)
    }
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|source| ConfigError::CreateDataDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DATA_DIR_ENV, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_dir_and_level() {
        let config = CoreConfig::from_lookup("/fallback", |name| match name {
            DATA_DIR_ENV => Some(" /data/app ".to_string()),
            LOG_LEVEL_ENV => Some("WARNING".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data/app"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            config.db_path(),
            PathBuf::from("/data/app/pocketnote.sqlite3")
        );
    }

    #[test]
    fn blank_env_falls_back_to_default_dir() {
        let config = CoreConfig::from_lookup("/fallback", |_| Some("  ".to_string())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/fallback"));
    }

    #[test]
    fn invalid_level_and_empty_dir_are_rejected() {
        let err = CoreConfig::new("/x").unwrap().with_log_level("loud").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
        assert!(matches!(
            CoreConfig::new(""),
            Err(ConfigError::EmptyDataDir)
        ));
    }

    #[test]
    fn open_store_creates_nested_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::new(dir.path().join("a").join("b")).unwrap();
        config.open_store().unwrap();
        assert!(config.db_path().exists());
    }
}
