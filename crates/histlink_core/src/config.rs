//! Engine configuration.
//!
//! # Responsibility
//! - Load host settings (logging, link store path, nickname table) from JSON.
//! - Build the effective nickname table from the configured sources.
//!
//! # Invariants
//! - Every field is optional; a missing file section means built-in defaults.
//! - Validation happens once in `validate`, before any value is used.

use crate::logging::default_log_level;
use crate::names::nicknames::{NicknameTable, NicknameTableError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    RelativeLogDir(PathBuf),
    EmptyPath(&'static str),
    Nicknames(NicknameTableError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
            Self::EmptyPath(field) => write!(f, "config field `{field}` cannot be blank"),
            Self::Nicknames(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Nicknames(err) => Some(err),
            Self::RelativeLogDir(_) | Self::EmptyPath(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<NicknameTableError> for ConfigError {
    fn from(value: NicknameTableError) -> Self {
        Self::Nicknames(value)
    }
}

/// Settings shared by every engine host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Falls back to `default_log_level()` when absent.
    pub log_level: Option<String>,
    /// Absolute directory for rotating log files; no file logging when absent.
    pub log_dir: Option<PathBuf>,
    /// Link store file; batch runs stay in memory when absent.
    pub database_path: Option<PathBuf>,
    /// Replaces the bundled nickname table.
    pub nicknames_path: Option<PathBuf>,
    /// Merged on top of whichever table is active.
    pub extra_nicknames: BTreeMap<String, Vec<String>>,
}

impl EngineConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(log_dir) = &self.log_dir {
            if log_dir.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath("log_dir"));
            }
            if !log_dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(log_dir.clone()));
            }
        }
        if self
            .database_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyPath("database_path"));
        }
        if self
            .nicknames_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyPath("nicknames_path"));
        }
        Ok(())
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(default_log_level())
    }

    /// Builds the nickname table: the configured file (or the bundled one)
    /// plus `extra_nicknames`.
    pub fn nickname_table(&self) -> Result<NicknameTable, ConfigError> {
        let mut table = match &self.nicknames_path {
            Some(path) => NicknameTable::load(path)?,
            None => NicknameTable::bundled(),
        };
        if !self.extra_nicknames.is_empty() {
            table.merge(&NicknameTable::from_map(self.extra_nicknames.clone())?);
        }
        Ok(table)
    }
}
