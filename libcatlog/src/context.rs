/*
 * Per-call metadata
 *
 * A Context is stamped once per log call and lives only on the calling
 * stack. Thread identities are small integers handed out in the order
 * threads first log, not OS thread ids.
 */

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::level::Level;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static THREAD_ID: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Identity of the calling thread, assigned on first use.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|slot| match slot.get() {
        Some(id) => id,
        None => {
            let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
            slot.set(Some(id));
            id
        }
    })
}

/// Source file and line of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32) -> Self {
        SourceLocation { file, line }
    }

    /// Location of the caller, following `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }

    /// Final path component, or the whole path when it has none.
    pub fn file_name(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        SourceLocation::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Immutable metadata for a single log call
#[derive(Debug, Clone)]
pub struct Context<'a> {
    category: &'a str,
    level: Level,
    timestamp: DateTime<Utc>,
    thread_id: u64,
    location: Option<SourceLocation>,
}

impl<'a> Context<'a> {
    pub fn make(category: &'a str, level: Level) -> Self {
        Self::from_parts(category, level, Utc::now(), current_thread_id(), None)
    }

    pub fn make_with_location(category: &'a str, level: Level, location: SourceLocation) -> Self {
        Self::from_parts(category, level, Utc::now(), current_thread_id(), Some(location))
    }

    /// Build a context with a caller-supplied clock reading and thread identity.
    pub fn from_parts(
        category: &'a str,
        level: Level,
        timestamp: DateTime<Utc>,
        thread_id: u64,
        location: Option<SourceLocation>,
    ) -> Self {
        Context {
            category,
            level,
            timestamp,
            thread_id,
            location,
        }
    }

    pub fn category(&self) -> &'a str {
        self.category
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn same_thread_same_identity() {
        let a = Context::make("test", Level::Info);
        let b = Context::make("test", Level::Debug);
        assert_eq!(a.thread_id(), b.thread_id());
    }

    #[test]
    fn distinct_threads_distinct_identities() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (current_thread_id(), current_thread_id())))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            let (first, second) = handle.join().unwrap();
            assert_eq!(first, second);
            assert!(seen.insert(first), "identity {} handed out twice", first);
        }
        assert!(!seen.contains(&current_thread_id()));
    }

    #[test]
    fn captures_caller_location() {
        let here = line!() + 1;
        let ctx = Context::make_with_location("net", Level::Warn, SourceLocation::caller());
        let location = ctx.location().unwrap();
        assert_eq!(location.line, here);
        assert_eq!(location.file_name(), "context.rs");
        assert_eq!(ctx.category(), "net");
        assert_eq!(ctx.level(), Level::Warn);
    }

    #[test]
    fn file_name_of_bare_name() {
        assert_eq!(SourceLocation::new("main.rs", 3).file_name(), "main.rs");
        assert_eq!(SourceLocation::new("a/b/c.rs", 3).to_string(), "a/b/c.rs:3");
    }
}
