//! Runtime configuration for template storage hosts.
//!
//! # Responsibility
//! - Hold the database location and logging settings a host needs to
//!   open storage and start logging.
//! - Apply `SHOOT_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - Blank environment values are ignored, never applied as empty settings.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SHOOT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SHOOT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SHOOT_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "shoot.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// SQLite database file holding the `templates` table.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotating log files. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ContentConfig {
    /// Defaults overridden by `SHOOT_DB_PATH`, `SHOOT_LOG_LEVEL` and
    /// `SHOOT_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(value) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(value));
        }
        config
    }
}
