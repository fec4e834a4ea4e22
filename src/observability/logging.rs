//! Structured logging configuration.

use crate::config::LoggingSettings;
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable overriding the log format.
pub const LOG_FORMAT_ENV: &str = "UNITSPLIT_LOG_FORMAT";

/// Environment variable overriding the log file.
pub const LOG_FILE_ENV: &str = "UNITSPLIT_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Returns the format as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidInput(format!("Unknown log format: {other}"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging config from file settings and environment overrides.
    ///
    /// The level falls back to `info`, or `debug` when `verbose` is set.
    /// An unknown format is ignored with the default kept.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let default_level = if verbose { "debug" } else { "info" };

        let mut config = Self {
            level: settings
                .and_then(|s| s.level.clone())
                .unwrap_or_else(|| default_level.to_string()),
            ..Self::default()
        };

        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .or_else(|| settings.and_then(|s| s.format.clone()));
        if let Some(format) = format {
            config.format = format.parse().unwrap_or_default();
        }

        config.file = std::env::var_os(LOG_FILE_ENV)
            .map(PathBuf::from)
            .or_else(|| settings.and_then(|s| s.file.clone()));

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_level_defaults() {
        let quiet = LoggingConfig::from_settings(None, false);
        let verbose = LoggingConfig::from_settings(None, true);
        assert_eq!(quiet.level, "info");
        assert_eq!(verbose.level, "debug");
    }

    #[test]
    fn test_configured_level_wins_over_verbose() {
        let settings = LoggingSettings {
            level: Some("warn".to_string()),
            ..LoggingSettings::default()
        };
        let config = LoggingConfig::from_settings(Some(&settings), true);
        assert_eq!(config.level, "warn");
    }
}
