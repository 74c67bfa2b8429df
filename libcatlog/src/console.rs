/*
 * Console sink
 *
 * Error lines go to stderr, everything else to stdout. Each line is one
 * write on the locked stream, so concurrent lines do not interleave.
 * On Windows every line is mirrored to the debugger output channel.
 */

use std::io::{self, Write};

use crate::context::Context;
use crate::level::Level;
use crate::sink::Sink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn for_level(level: Level) -> Self {
        match level {
            Level::Error => Stream::Stderr,
            Level::Warn | Level::Info | Level::Debug => Stream::Stdout,
        }
    }

    fn write_line(self, line: &str) -> io::Result<()> {
        match self {
            Stream::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            Stream::Stderr => io::stderr().lock().write_all(line.as_bytes()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        ConsoleSink
    }
}

impl Sink for ConsoleSink {
    fn handle(&self, line: &str, context: &Context<'_>) {
        let _ = Stream::for_level(context.level()).write_line(line);
        debug_output::mirror(line);
    }
}

#[cfg(windows)]
mod debug_output {
    use std::ffi::CString;
    use windows_sys::Win32::System::Diagnostics::Debug::OutputDebugStringA;

    pub fn mirror(line: &str) {
        // Lines with interior NULs cannot cross the C boundary; skip them
        if let Ok(c_line) = CString::new(line) {
            // SAFETY: c_line is NUL-terminated and outlives the call
            unsafe { OutputDebugStringA(c_line.as_ptr().cast()) }
        }
    }
}

#[cfg(not(windows))]
mod debug_output {
    pub fn mirror(_line: &str) {}
}
