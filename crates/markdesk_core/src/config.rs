//! Application configuration.
//!
//! # Responsibility
//! - Load client settings from JSON.
//! - Normalize the log level and validate the log directory up front.
//!
//! # Invariants
//! - A validated config always carries a supported log level.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, init_logging, normalize_level, LoggingError};
use crate::navigation::confirm::Prompts;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub prompts: Prompts,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            prompts: Prompts::default(),
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON document; missing keys take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validated()
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Starts file logging when a directory is configured.
    ///
    /// Returns whether logging was initialized.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        match &self.log_dir {
            Some(dir) => {
                init_logging(&self.log_level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(&self.log_level)?.to_string();
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(LoggingError::InvalidDirectory(format!(
                    "`{}` is not absolute",
                    dir.display()
                ))
                .into());
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::logging::LoggingError;

    #[test]
    fn empty_object_yields_defaults() {
        let config = AppConfig::from_json_str("{}").expect("defaults should validate");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn level_is_normalized_and_prompts_merge_with_defaults() {
        let config = AppConfig::from_json_str(
            r#"{"log_level": "WARNING", "prompts": {"delete_document": "Drop {name}?"}}"#,
        )
        .expect("config should parse");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.prompts.delete_prompt("a"), "Drop a?");
        assert!(config.prompts.unsaved_changes.contains("changed"));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = AppConfig::from_json_str(r#"{"log_dir": "logs"}"#)
            .expect_err("relative dir must fail");
        assert!(matches!(
            err,
            ConfigError::Logging(LoggingError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn logging_is_skipped_without_directory() {
        assert_eq!(AppConfig::default().init_logging().ok(), Some(false));
    }
}
