/*
 * Main library entry point that exposes the public API
 *
 * This file defines the public interface of catlog, including:
 * - Re-exporting Instance for setup and Logger for everyday use
 * - Re-exporting Config, Level, Target and the Sink trait for customization
 * - Defining logging macros (log_error, log_warn, log_info, log_debug)
 *
 * The macros take a Logger and a format string, interpolate the arguments
 * and record the call site as the message's source location.
 */

mod config;
mod console;
mod context;
mod error;
mod file;
pub mod formatter;
mod instance;
mod level;
mod logger;
mod sink;
mod target;

pub use config::{
    Config, FormatSnapshot, FormatTemplate, LocationMode, TimestampMode, DEFAULT_FORMAT,
    MAX_FORMAT_LEN,
};
pub use console::ConsoleSink;
pub use context::{current_thread_id, Context, SourceLocation};
pub use error::{Error, Result};
pub use file::FileSink;
pub use instance::{is_active, log, print, Instance};
pub use level::{Level, ParseLevelError};
pub use logger::{Logger, UNKNOWN_CATEGORY};
pub use sink::Sink;
pub use target::Target;

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}
