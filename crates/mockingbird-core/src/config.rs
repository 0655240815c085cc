//! Mockingbird configuration.
//!
//! Configuration is plain serde data with defaults for every field, so a TOML
//! file only needs to name the settings it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting holds a value outside its allowed set.
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Built-in report formats as `(canonical id, aliases)`.
pub const REPORT_FORMATS: [(&str, &[&str]); 4] = [
    ("txt", &["text"]),
    ("json", &[]),
    ("html", &["htm"]),
    ("xml", &[]),
];

/// Canonical id of the built-in report format named by `id` or one of its
/// aliases, ignoring case and surrounding whitespace.
pub fn builtin_report_format(id: &str) -> Option<&'static str> {
    let id = id.trim().to_ascii_lowercase();
    REPORT_FORMATS
        .iter()
        .find(|(canonical, aliases)| *canonical == id || aliases.contains(&id.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// Whether `id` can name a report formatter at all. Ids outside
/// [`REPORT_FORMATS`] belong to formatters registered at runtime.
fn is_format_id(id: &str) -> bool {
    let id = id.trim();
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MockingbirdConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Mock defaults.
    pub mocks: MockSettings,

    /// Report aggregation and export.
    pub reporting: ReportingSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Log format (pretty, json, compact).
    pub format: String,

    /// Whether to include span information.
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            include_spans: false,
        }
    }
}

/// Mock generation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Disable name-based default return values; unconfigured methods then
    /// fail with `NotConfigured`.
    pub strict_defaults: bool,
}

/// Report aggregation and export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingSettings {
    /// Format id used when none is requested explicitly.
    pub default_format: String,

    /// Directory reports are exported into.
    pub output_dir: PathBuf,

    /// Delimiter splitting a test name into its category prefix.
    pub category_delimiter: String,

    /// Pretty-print JSON reports.
    pub pretty_json: bool,
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            default_format: "txt".to_string(),
            output_dir: PathBuf::from("test-reports"),
            category_delimiter: "_".to_string(),
            pretty_json: true,
        }
    }
}

impl MockingbirdConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("unknown level {:?}", self.logging.level),
            ));
        }

        if !LOG_FORMATS.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.format",
                format!("unknown format {:?}", self.logging.format),
            ));
        }

        if !is_format_id(&self.reporting.default_format) {
            return Err(ConfigError::invalid(
                "reporting.default_format",
                format!("{:?} is not a format id", self.reporting.default_format),
            ));
        }

        if self.reporting.category_delimiter.is_empty() {
            return Err(ConfigError::invalid(
                "reporting.category_delimiter",
                "delimiter must not be empty",
            ));
        }

        Ok(())
    }
}
