//! Runtime configuration resolved from global CLI options and environment.

use clap::Args;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use stockledger_core::{default_log_level, LogLevel};

pub const DEFAULT_DB_PATH: &str = "stockledger.sqlite3";

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// SQLite ledger file.
    #[arg(
        long = "db",
        global = true,
        env = "STOCKLEDGER_DB_PATH",
        default_value = DEFAULT_DB_PATH
    )]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error; defaults per build mode.
    #[arg(long, global = true, env = "STOCKLEDGER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotated log files; file logging is off when absent.
    #[arg(long, global = true, env = "STOCKLEDGER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// Always absolute when present.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidLogLevel(String),
    UnresolvableLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "database path must not be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::UnresolvableLogDir(message) => write!(f, "invalid log directory: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    pub fn resolve(args: &GlobalArgs) -> Result<Self, ConfigError> {
        if args.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }

        let log_level = match args.log_level.as_deref() {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = args.log_dir.as_deref().map(absolute_dir).transpose()?;

        Ok(Self {
            db_path: args.db_path.clone(),
            log_level,
            log_dir,
        })
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    if dir.as_os_str().is_empty() {
        return Err(ConfigError::UnresolvableLogDir("path is empty".to_string()));
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|err| ConfigError::UnresolvableLogDir(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, GlobalArgs};
    use std::path::PathBuf;
    use stockledger_core::LogLevel;

    fn args() -> GlobalArgs {
        GlobalArgs {
            db_path: PathBuf::from("ledger.sqlite3"),
            log_level: None,
            log_dir: None,
        }
    }

    #[test]
    fn log_level_is_parsed_case_insensitively() {
        let config = AppConfig::resolve(&GlobalArgs {
            log_level: Some("WARNING".to_string()),
            ..args()
        })
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = AppConfig::resolve(&GlobalArgs {
            log_level: Some("loud".to_string()),
            ..args()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn relative_log_dir_becomes_absolute() {
        let config = AppConfig::resolve(&GlobalArgs {
            log_dir: Some(PathBuf::from("logs")),
            ..args()
        })
        .unwrap();
        let log_dir = config.log_dir.unwrap();
        assert!(log_dir.is_absolute());
        assert!(log_dir.ends_with("logs"));
    }

    #[test]
    fn empty_db_path_is_rejected() {
        let err = AppConfig::resolve(&GlobalArgs {
            db_path: PathBuf::new(),
            ..args()
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyDbPath);
    }
}
