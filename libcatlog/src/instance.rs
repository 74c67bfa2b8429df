/*
 * Process-wide logging instance
 *
 * This file implements:
 * - Construction of the single active Instance, with duplicate detection
 * - Runtime config replacement and user sink registration
 * - The print pipeline: threshold check, target resolution, rendering
 *   and dispatch to the console, file and user sinks
 * - Free functions that reach the active Instance, if any
 *
 * No lock is held while sinks run. The global slot and the user sink list
 * are only read long enough to clone an Arc, so a sink may log from inside
 * `handle` while another thread registers a sink or drops the Instance.
 * Registration copies the list and swaps the new one in.
 */

use once_cell::sync::Lazy;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use crate::config::{Config, FormatSnapshot};
use crate::console::ConsoleSink;
use crate::context::{Context, SourceLocation};
use crate::error::{Error, Result};
use crate::file::FileSink;
use crate::formatter;
use crate::level::Level;
use crate::sink::Sink;
use crate::target::Target;

type SinkList = Arc<Vec<Arc<dyn Sink>>>;

static ACTIVE: Lazy<RwLock<Option<Arc<Core>>>> = Lazy::new(|| RwLock::new(None));

fn active_read() -> RwLockReadGuard<'static, Option<Arc<Core>>> {
    ACTIVE.read().unwrap_or_else(PoisonError::into_inner)
}

fn active_write() -> RwLockWriteGuard<'static, Option<Arc<Core>>> {
    ACTIVE.write().unwrap_or_else(PoisonError::into_inner)
}

fn active_core() -> Option<Arc<Core>> {
    active_read().clone()
}

struct Core {
    config: Mutex<Config>,
    console: ConsoleSink,
    file: FileSink,
    sinks: RwLock<SinkList>,
}

impl Core {
    fn config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn verbose(&self) -> bool {
        self.config().verbose
    }

    fn sinks(&self) -> SinkList {
        Arc::clone(&self.sinks.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Ceiling check and target lookup; `None` when the message is dropped.
    fn route(&self, context: &Context<'_>) -> Option<(Target, FormatSnapshot)> {
        let config = self.config();
        if !config.accepts(context.category(), context.level()) {
            return None;
        }
        Some((config.target_for(context.level()), config.snapshot()))
    }

    fn print(&self, message: &str, context: &Context<'_>) {
        if let Some((target, snapshot)) = self.route(context) {
            self.dispatch(message, context, target, &snapshot);
        }
    }

    // Interpolation only happens for messages that pass the ceiling
    fn print_args(&self, args: fmt::Arguments<'_>, context: &Context<'_>) {
        if let Some((target, snapshot)) = self.route(context) {
            match args.as_str() {
                Some(message) => self.dispatch(message, context, target, &snapshot),
                None => self.dispatch(&args.to_string(), context, target, &snapshot),
            }
        }
    }

    fn dispatch(&self, message: &str, context: &Context<'_>, target: Target, snapshot: &FormatSnapshot) {
        let line = formatter::render(message, context, snapshot);

        if target.contains(Target::CONSOLE) {
            self.console.handle(&line, context);
        }
        if target.contains(Target::FILE) {
            self.file.handle(&line, context);
        }
        if target.contains(Target::SINKS) {
            for sink in self.sinks().iter() {
                sink.handle(&line, context);
            }
        }
    }
}

/// The process-wide logging orchestrator.
///
/// At most one exists at a time. Create it at the top of `main` and keep it
/// alive for as long as anything logs; dropping it flushes the log file.
pub struct Instance {
    core: Arc<Core>,
    closed: bool,
}

impl Instance {
    /// Activate logging to `path` (truncated) and the console.
    ///
    /// Fails with `Error::DuplicateInstance` while another Instance is alive.
    pub fn new(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let mut slot = active_write();
        if slot.is_some() {
            return Err(Error::DuplicateInstance);
        }

        let verbose = config.verbose;
        let file = FileSink::new(path)?;
        if verbose {
            eprintln!("[catlog] logging to {}", file.path().display());
        }

        let core = Arc::new(Core {
            config: Mutex::new(config),
            console: ConsoleSink::new(),
            file,
            sinks: RwLock::new(Arc::new(Vec::new())),
        });
        *slot = Some(Arc::clone(&core));

        Ok(Instance { core, closed: false })
    }

    pub fn config(&self) -> Config {
        self.core.config().clone()
    }

    /// Replace the whole config.
    pub fn set_config(&self, config: Config) {
        let verbose = config.verbose;
        *self.core.config() = config;
        if verbose {
            eprintln!("[catlog] config replaced");
        }
    }

    /// Register a user sink. Sinks receive lines in registration order and
    /// are kept until the Instance is dropped.
    ///
    /// Safe to call while other threads are logging; calls already in
    /// flight keep dispatching to the list they started with.
    pub fn add_sink(&self, sink: impl Sink + 'static) {
        let count = {
            let mut sinks = self.core.sinks.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = Vec::with_capacity(sinks.len() + 1);
            next.extend(sinks.iter().cloned());
            next.push(Arc::new(sink) as Arc<dyn Sink>);
            *sinks = Arc::new(next);
            sinks.len()
        };
        if self.core.verbose() {
            eprintln!("[catlog] registered user sink #{}", count);
        }
    }

    pub fn print(&self, message: &str, context: &Context<'_>) {
        self.core.print(message, context);
    }

    pub fn file_path(&self) -> &Path {
        self.core.file.path()
    }

    /// Flush cycles whose data could not be written to the log file so far
    pub fn failed_flushes(&self) -> u64 {
        self.core.file.failed_flushes()
    }

    /// Deactivate, drain the log file and return the final failed-flush count.
    pub fn shutdown(mut self) -> u64 {
        self.close()
    }

    fn close(&mut self) -> u64 {
        if !self.closed {
            self.closed = true;

            {
                let mut slot = active_write();
                if slot.as_ref().is_some_and(|active| Arc::ptr_eq(active, &self.core)) {
                    *slot = None;
                }
            }

            // Calls that cloned the core before the slot was cleared still hold it
            while Arc::strong_count(&self.core) > 1 {
                thread::yield_now();
            }
            if let Some(core) = Arc::get_mut(&mut self.core) {
                core.file.finish();
            }

            if self.core.verbose() {
                eprintln!(
                    "[catlog] shut down, {} failed flush(es)",
                    self.core.file.failed_flushes()
                );
            }
        }
        self.core.file.failed_flushes()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("file", &self.file_path())
            .field("config", &self.config())
            .finish()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        self.close();
    }
}

/// Deliver `message` to the active Instance; silently dropped when none.
pub fn print(message: &str, context: &Context<'_>) {
    if let Some(core) = active_core() {
        core.print(message, context);
    }
}

pub(crate) fn print_args(args: fmt::Arguments<'_>, context: &Context<'_>) {
    if let Some(core) = active_core() {
        core.print_args(args, context);
    }
}

/// True while an Instance is alive.
pub fn is_active() -> bool {
    active_read().is_some()
}

/// Format and submit a message without a Logger handle.
#[track_caller]
pub fn log(category: &str, level: Level, args: fmt::Arguments<'_>) {
    let context = Context::make_with_location(category, level, SourceLocation::caller());
    print_args(args, &context);
}
