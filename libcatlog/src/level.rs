/*
 * Severity levels
 *
 * Levels are totally ordered by rank, where a lower rank is more severe:
 * Error (0) < Warn (1) < Info (2) < Debug (3). A message passes a ceiling
 * when its level is at least as severe as that ceiling.
 */

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Log severity levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    /// Every level, most severe first
    pub const ALL: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// True when `self` is at least as severe as `other`.
    pub fn is_at_least(self, other: Level) -> bool {
        self.rank() <= other.rank()
    }

    /// Single-character rendering used by the `{level}` placeholder.
    pub fn as_char(self) -> char {
        match self {
            Level::Error => 'E',
            Level::Warn => 'W',
            Level::Info => 'I',
            Level::Debug => 'D',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

// Case-insensitive, so config files may say "Error", "error" or "ERROR"
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(&s, &["error", "warn", "warning", "info", "debug"])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_rank() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert_eq!(Level::Debug.rank(), 3);
    }

    #[test]
    fn severity_comparison() {
        assert!(Level::Error.is_at_least(Level::Debug));
        assert!(Level::Warn.is_at_least(Level::Warn));
        assert!(!Level::Debug.is_at_least(Level::Info));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("ERROR".parse::<Level>(), Ok(Level::Error));
        assert_eq!("Warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("info".parse::<Level>(), Ok(Level::Info));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn single_char_rendering() {
        let chars: String = Level::ALL.iter().map(|l| l.as_char()).collect();
        assert_eq!(chars, "EWID");
    }
}
