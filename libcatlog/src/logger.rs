/*
 * Per-category logging handle
 *
 * A Logger binds a category once and submits messages through the
 * process-wide entry point. It holds no reference to the Instance, so it
 * can be created before logging starts and used after it ends; messages
 * sent while no Instance is active are discarded.
 */

use std::fmt;
use std::sync::Arc;

use crate::context::{Context, SourceLocation};
use crate::instance;
use crate::level::Level;

/// Category used when a Logger is created with an empty name
pub const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    category: Arc<str>,
}

impl Logger {
    pub fn new(category: impl AsRef<str>) -> Self {
        let category = match category.as_ref() {
            "" => UNKNOWN_CATEGORY,
            name => name,
        };
        Logger {
            category: Arc::from(category),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Submit a message at `level`, recording the caller's location.
    ///
    /// Arguments are only formatted when the message passes the ceiling.
    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let context = Context::make_with_location(&self.category, level, SourceLocation::caller());
        instance::print_args(args, &context);
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args)
    }

    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args)
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args)
    }

    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(UNKNOWN_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn empty_category_is_normalized() {
        assert_eq!(Logger::new("").category(), UNKNOWN_CATEGORY);
        assert_eq!(Logger::default().category(), UNKNOWN_CATEGORY);
        assert_eq!(Logger::new("audio").category(), "audio");
    }

    #[test]
    #[serial]
    fn logging_without_instance_is_silent() {
        // No Instance in this test; must be a no-op rather than a panic
        assert!(!instance::is_active());
        let logger = Logger::new("orphan");
        logger.error(format_args!("dropped {}", 1));
        logger.debug(format_args!("dropped"));
    }
}
