/*
 * Configuration for catlog
 *
 * This module handles:
 * - The Config value type: format template, global and per-category
 *   ceilings, per-level destination overrides and rendering modes
 * - Validation of the format template length
 * - Parsing configuration from TOML, either from a [logging] section or
 *   from a top-level table
 *
 * An absent entry in `category_max_levels` or `level_targets` means the
 * global default applies for that axis.
 */

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::level::Level;
use crate::target::Target;

/// Longest accepted format template, in bytes
pub const MAX_FORMAT_LEN: usize = 256;

pub const DEFAULT_FORMAT: &str = "[{timestamp}][{level}][T{thread}][{category}] {message}";

/// A validated format template.
///
/// Cloning is cheap, so snapshots can be taken on every log call.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct FormatTemplate(Arc<str>);

impl FormatTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if template.len() > MAX_FORMAT_LEN {
            return Err(Error::FormatTooLong {
                len: template.len(),
                max: MAX_FORMAT_LEN,
            });
        }
        Ok(FormatTemplate(template.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FormatTemplate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        FormatTemplate::new(value)
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        FormatTemplate(Arc::from(DEFAULT_FORMAT))
    }
}

impl fmt::Debug for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Clock used when rendering `{timestamp}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    #[default]
    Local,
    #[serde(alias = "UTC")]
    Utc,
}

/// How much of the source path `{location}` shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    #[default]
    FullPath,
    #[serde(alias = "filename")]
    FileName,
}

/// Configuration for the logging instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering template, see the formatter for keywords
    pub format: FormatTemplate,

    /// Global verbosity ceiling
    pub max_level: Level,

    /// Per-category ceilings that replace `max_level` for that category
    pub category_max_levels: HashMap<String, Level>,

    /// Per-level destination overrides; levels without an entry go everywhere
    pub level_targets: HashMap<Level, Target>,

    pub timestamp_mode: TimestampMode,

    pub location_mode: LocationMode,

    /// Report the instance's own lifecycle on stderr
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: FormatTemplate::default(),
            max_level: Level::Debug,
            category_max_levels: HashMap::new(),
            level_targets: HashMap::new(),
            timestamp_mode: TimestampMode::Local,
            location_mode: LocationMode::FullPath,
            verbose: false,
        }
    }
}

/// The formatting-relevant part of a Config, copied out under the lock
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSnapshot {
    pub format: FormatTemplate,
    pub timestamp_mode: TimestampMode,
    pub location_mode: LocationMode,
}

impl Default for FormatSnapshot {
    fn default() -> Self {
        Config::default().snapshot()
    }
}

impl Config {
    /// Replace the format template, validating its length.
    pub fn with_format(mut self, template: impl Into<String>) -> Result<Self> {
        self.format = FormatTemplate::new(template)?;
        Ok(self)
    }

    /// Effective ceiling for `category`.
    pub fn ceiling_for(&self, category: &str) -> Level {
        self.category_max_levels
            .get(category)
            .copied()
            .unwrap_or(self.max_level)
    }

    /// True when a message at `level` for `category` passes the ceiling.
    pub fn accepts(&self, category: &str, level: Level) -> bool {
        level.is_at_least(self.ceiling_for(category))
    }

    /// Effective destinations for `level`.
    pub fn target_for(&self, level: Level) -> Target {
        self.level_targets.get(&level).copied().unwrap_or(Target::ALL)
    }

    pub fn snapshot(&self) -> FormatSnapshot {
        FormatSnapshot {
            format: self.format.clone(),
            timestamp_mode: self.timestamp_mode,
            location_mode: self.location_mode,
        }
    }

    /// Parse a TOML document, preferring a `[logging]` section when present.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut table: toml::Table = source.parse()?;
        let config: Config = match table.remove("logging") {
            Some(section) => section.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        Ok(config)
    }

    /// Create configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Like `from_file`, but a missing or unreadable file yields the defaults.
    ///
    /// A file that exists and fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::from_file(path) {
            Err(Error::ConfigRead { path, source }) => {
                eprintln!(
                    "Warning: Could not read config file '{}': {}. Using defaults.",
                    path.display(),
                    source
                );
                Ok(Config::default())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.format.as_str(), DEFAULT_FORMAT);
        assert_eq!(config.max_level, Level::Debug);
        assert_eq!(config.timestamp_mode, TimestampMode::Local);
        assert!(!config.verbose);
        assert_eq!(config.target_for(Level::Info), Target::ALL);
    }

    #[test]
    fn rejects_long_template() {
        let long = "x".repeat(MAX_FORMAT_LEN + 1);
        match FormatTemplate::new(long) {
            Err(Error::FormatTooLong { len, max }) => {
                assert_eq!(len, MAX_FORMAT_LEN + 1);
                assert_eq!(max, MAX_FORMAT_LEN);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(FormatTemplate::new("x".repeat(MAX_FORMAT_LEN)).is_ok());
    }

    #[test]
    fn category_override_takes_precedence() {
        let mut config = Config::default();
        config.max_level = Level::Info;
        config.category_max_levels.insert("render".into(), Level::Error);

        assert_eq!(config.ceiling_for("render"), Level::Error);
        assert_eq!(config.ceiling_for("input"), Level::Info);
        assert!(!config.accepts("render", Level::Warn));
        assert!(config.accepts("input", Level::Warn));
    }

    #[test]
    fn parses_logging_section() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8080

            [logging]
            format = "{level} {message}"
            max_level = "info"
            timestamp_mode = "utc"
            location_mode = "file_name"
            verbose = true

            [logging.category_max_levels]
            render = "warn"

            [logging.level_targets]
            debug = ["file"]
            error = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.format.as_str(), "{level} {message}");
        assert_eq!(config.max_level, Level::Info);
        assert_eq!(config.timestamp_mode, TimestampMode::Utc);
        assert_eq!(config.location_mode, LocationMode::FileName);
        assert!(config.verbose);
        assert_eq!(config.ceiling_for("render"), Level::Warn);
        assert_eq!(config.target_for(Level::Debug), Target::FILE);
        assert_eq!(config.target_for(Level::Error), Target::CONSOLE | Target::FILE);
        assert_eq!(config.target_for(Level::Info), Target::ALL);
    }

    #[test]
    fn parses_top_level_table_with_defaults() {
        let config = Config::from_toml_str(r#"max_level = "error""#).unwrap();
        assert_eq!(config.max_level, Level::Error);
        assert_eq!(config.format.as_str(), DEFAULT_FORMAT);
    }

    #[test]
    fn overlong_template_in_file_is_an_error() {
        let doc = format!("format = \"{}\"", "y".repeat(MAX_FORMAT_LEN + 10));
        assert!(matches!(Config::from_toml_str(&doc), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn malformed_file_is_not_replaced_by_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_config.toml");
        fs::write(&path, "[logging]\nmax_level = \"loud\"\n").unwrap();
        assert!(matches!(Config::load_or_default(&path), Err(Error::ConfigParse(_))));

        fs::write(&path, "[logging\n").unwrap();
        assert!(matches!(Config::load_or_default(&path), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Config::from_file(&path), Err(Error::ConfigRead { .. })));
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }
}
