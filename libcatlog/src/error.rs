//! Error types for logger construction and configuration

use std::io;
use std::path::PathBuf;

/// Result type for catlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while setting up logging.
///
/// The logging path itself never fails; these only come out of constructors
/// and config loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An Instance is already active in this process
    #[error("a logging instance is already active")]
    DuplicateInstance,

    /// Format template exceeds the maximum length
    #[error("format template is {len} bytes, maximum is {max}")]
    FormatTooLong { len: usize, max: usize },

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    /// Config file is not valid TOML for a Config
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Failed to create the log file's directory
    #[error("failed to create log directory at {path}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    /// A log file from a previous run could not be removed
    #[error("failed to remove existing log file {path}: {source}")]
    RemoveStale { path: PathBuf, source: io::Error },

    /// The background writer thread could not be started
    #[error("failed to spawn log writer thread: {0}")]
    SpawnWriter(io::Error),
}
