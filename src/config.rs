//! Database location and timeout resolution.
//!
//! The database path comes from, in order: an explicit path, the
//! `JOBBOARD_DB_PATH` variable, `$XDG_DATA_HOME/jobboard/jobboard.db`, and
//! `$HOME/.local/share/jobboard/jobboard.db`. The special path `:memory:`
//! selects a private in-memory database.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use crate::db::RequestContext;

pub const DB_PATH_ENV: &str = "JOBBOARD_DB_PATH";
pub const DB_TIMEOUT_ENV: &str = "JOBBOARD_DB_TIMEOUT_MS";

const APP_DIR: &str = "jobboard";
const DB_FILE: &str = "jobboard.db";
const MEMORY_PATH: &str = ":memory:";
const XDG_DATA_HOME: &str = "XDG_DATA_HOME";
const HOME: &str = "HOME";

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cannot locate a data directory: neither XDG_DATA_HOME nor HOME is set")]
    #[diagnostic(
        code(jobboard::config::no_data_dir),
        help("Pass --db <path> or set JOBBOARD_DB_PATH")
    )]
    NoDataDir,

    #[error("Invalid JOBBOARD_DB_TIMEOUT_MS value: {value}")]
    #[diagnostic(
        code(jobboard::config::invalid_timeout),
        help("Use a positive number of milliseconds")
    )]
    InvalidTimeout { value: String },
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    location: DbLocation,
    timeout: Option<Duration>,
}

impl DbConfig {
    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
            timeout: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: location_for(path.into()),
            timeout: None,
        }
    }

    /// Resolve from the process environment.
    pub fn from_env(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::resolve(explicit, |key| env::var(key).ok())
    }

    /// Resolve with a caller-supplied variable lookup. Empty values count
    /// as unset.
    pub fn resolve<F>(explicit: Option<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let path = match explicit {
            Some(path) => path,
            None => match var(DB_PATH_ENV) {
                Some(path) => PathBuf::from(path),
                None => default_db_path(var(XDG_DATA_HOME), var(HOME))?,
            },
        };

        let timeout = var(DB_TIMEOUT_ENV).map(|v| parse_timeout(&v)).transpose()?;

        Ok(Self {
            location: location_for(path),
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// A fresh request context carrying the configured timeout, if any.
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::generate();
        match self.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

fn default_db_path(
    xdg_data_home: Option<String>,
    home: Option<String>,
) -> Result<PathBuf, ConfigError> {
    let data_home = match (xdg_data_home, home) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => Path::new(&home).join(".local/share"),
        (None, None) => return Err(ConfigError::NoDataDir),
    };
    Ok(data_home.join(APP_DIR).join(DB_FILE))
}

fn location_for(path: PathBuf) -> DbLocation {
    if path.as_os_str() == MEMORY_PATH {
        DbLocation::Memory
    } else {
        DbLocation::File(path)
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}
