//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "UNITSPLIT_CONFIG_PATH";

/// Default source table path.
pub const DEFAULT_INPUT: &str = "remessa/file.csv";

/// Default destination directory.
pub const DEFAULT_OUTPUT_DIR: &str = "unidades_recebiveis";

/// Main configuration for unitsplit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitsplitConfig {
    /// Source table path.
    pub input: PathBuf,
    /// Destination directory for units files.
    pub output_dir: PathBuf,
    /// Open the destination in the platform file browser after a run.
    pub open_output_dir: bool,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Logging section in config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Filter directive, e.g. "info" or "unitsplit=debug".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Log file path (stderr when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Source table path.
    pub input: Option<String>,
    /// Destination directory.
    pub output_dir: Option<String>,
    /// Open the destination after a run.
    pub open_output_dir: Option<bool>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

impl Default for UnitsplitConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            open_output_dir: false,
            logging: LoggingSettings::default(),
            source: None,
        }
    }
}

impl UnitsplitConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration, honoring an explicit path first.
    ///
    /// Order: `explicit`, then `UNITSPLIT_CONFIG_PATH`, then the default
    /// locations (see [`Self::load_default`]).
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> crate::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Self::load_from_file(Path::new(&path));
        }
        Ok(Self::load_default())
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let mut config = Self::from_toml(&contents)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/unitsplit/` on macOS)
    /// 2. XDG config dir (`~/.config/unitsplit/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("unitsplit").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("unitsplit")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `UnitsplitConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(input) = file.input {
            config.input = PathBuf::from(input);
        }
        if let Some(output_dir) = file.output_dir {
            config.output_dir = PathBuf::from(output_dir);
        }
        if let Some(open) = file.open_output_dir {
            config.open_output_dir = open;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::OperationFailed {
            operation: "serialize_config".to_string(),
            cause: e.to_string(),
        })
    }

    /// Sets the source table path.
    #[must_use]
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    /// Sets the destination directory.
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Sets whether to open the destination after a run.
    #[must_use]
    pub const fn with_open_output_dir(mut self, open: bool) -> Self {
        self.open_output_dir = open;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UnitsplitConfig::new();
        assert_eq!(config.input, PathBuf::from("remessa/file.csv"));
        assert_eq!(config.output_dir, PathBuf::from("unidades_recebiveis"));
        assert!(!config.open_output_dir);
        assert!(config.source.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = UnitsplitConfig::from_toml("output_dir = \"out\"\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT));
    }

    #[test]
    fn test_logging_section() {
        let toml = r#"
            input = "in.csv"
            open_output_dir = true

            [logging]
            format = "json"
            level = "debug"
            file = "logs/unitsplit.log"
        "#;
        let config = UnitsplitConfig::from_toml(toml).unwrap();
        assert!(config.open_output_dir);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("logs/unitsplit.log"))
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(UnitsplitConfig::from_toml("delimiter = \",\"\n").is_err());
    }

    #[test]
    fn test_load_from_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "input = \"a.csv\"\n").unwrap();

        let config = UnitsplitConfig::load(Some(&path)).unwrap();
        assert_eq!(config.input, PathBuf::from("a.csv"));
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(UnitsplitConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = UnitsplitConfig::new()
            .with_input("x.csv")
            .with_output_dir("out")
            .with_open_output_dir(true);
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("open_output_dir = true"));
        assert_eq!(UnitsplitConfig::from_toml(&rendered).unwrap(), config);
    }
}
