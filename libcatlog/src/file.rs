/*
 * File sink
 *
 * Callers only append to an in-memory buffer; a single background thread
 * owns all disk I/O. The log file is deleted at construction so each run
 * starts fresh, then appended to by the writer.
 *
 * Writer loop:
 * 1. Wait until the buffer is non-empty or stop was requested.
 * 2. Stop with an empty buffer ends the loop.
 * 3. Otherwise swap the buffer out, append it to the file and go again.
 *
 * A stop request with pending data therefore still flushes that data. A
 * flush cycle whose file cannot be opened or written is dropped and counted.
 */

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::sink::Sink;

#[derive(Default)]
struct State {
    buffer: String,
    stop: bool,
}

struct Shared {
    state: Mutex<State>,
    wake: Condvar,
    failed_flushes: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct FileSink {
    path: PathBuf,
    shared: Arc<Shared>,
    writer: Option<JoinHandle<()>>,
}

impl FileSink {
    /// Remove any existing file at `path` and start the writer thread.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::RemoveStale {
                    path: path.clone(),
                    source,
                })
            }
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            wake: Condvar::new(),
            failed_flushes: AtomicU64::new(0),
        });

        let writer = {
            let shared = Arc::clone(&shared);
            let path = path.clone();
            thread::Builder::new()
                .name("catlog-writer".into())
                .spawn(move || write_loop(&shared, &path))
                .map_err(Error::SpawnWriter)?
        };

        Ok(FileSink {
            path,
            shared,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of flush cycles whose data was lost to I/O errors
    pub fn failed_flushes(&self) -> u64 {
        self.shared.failed_flushes.load(Ordering::Relaxed)
    }
}

impl Sink for FileSink {
    fn handle(&self, line: &str, _context: &Context<'_>) {
        self.shared.lock().buffer.push_str(line);
        self.shared.wake.notify_one();
    }
}

impl FileSink {
    /// Stop the writer after it drains the buffer. Later lines are kept in
    /// memory and never written.
    pub(crate) fn finish(&mut self) {
        self.shared.lock().stop = true;
        self.shared.wake.notify_one();
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        self.finish();
    }
}

fn write_loop(shared: &Shared, path: &Path) {
    loop {
        let pending = {
            let mut state = shared.lock();
            while state.buffer.is_empty() && !state.stop {
                state = shared.wake.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
            if state.buffer.is_empty() {
                return;
            }
            mem::take(&mut state.buffer)
        };

        if append(path, pending.as_bytes()).is_err() {
            shared.failed_flushes.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn append(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(bytes)
}
