use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use libcatlog::{log_debug, log_error, log_info, log_warn, Config, Context, Instance, Level, Logger, Sink};

const CONFIG_PATH: &str = "app_config.toml";
const LOG_PATH: &str = "logs/engine.log";

/// Counts error lines so the engine can report them at exit
struct ErrorCounter(Arc<AtomicUsize>);

impl Sink for ErrorCounter {
    fn handle(&self, _line: &str, context: &Context<'_>) {
        if context.level() == Level::Error {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn run_renderer(frames: u32) {
    let logger = Logger::new("renderer");
    log_info!(logger, "creating swapchain with {} images", 3);
    for frame in 0..frames {
        log_debug!(logger, "frame {} submitted", frame);
    }
    log_info!(logger, "rendered {} frames", frames);
}

fn run_input() {
    let logger = Logger::new("input");
    log_info!(logger, "polling devices");
    log_warn!(logger, "gamepad 1 disconnected");
}

fn run_assets(names: &[&str]) {
    let logger = Logger::new("assets");
    for name in names {
        if name.ends_with(".png") {
            log_debug!(logger, "loaded texture {}", name);
        } else {
            log_error!(logger, "unsupported asset format: {}", name);
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", CONFIG_PATH, e);
            return ExitCode::FAILURE;
        }
    };

    // Must outlive every subsystem below; dropping it flushes the log file
    let instance = match Instance::new(LOG_PATH, config) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Failed to start logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let errors = Arc::new(AtomicUsize::new(0));
    instance.add_sink(ErrorCounter(Arc::clone(&errors)));

    let logger = Logger::new("engine");
    log_info!(logger, "starting subsystems");

    thread::scope(|scope| {
        scope.spawn(|| run_renderer(5));
        scope.spawn(run_input);
        scope.spawn(|| run_assets(&["grass.png", "stone.png", "level1.fbx"]));
    });

    let errors = errors.load(Ordering::Relaxed);
    log_info!(logger, "shutdown with {} error(s)", errors);
    let failed = instance.shutdown();
    if failed > 0 {
        eprintln!("{} log flush(es) failed for {}", failed, LOG_PATH);
    }

    ExitCode::SUCCESS
}
