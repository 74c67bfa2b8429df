//! Runs alone in its own process so this test's thread is the first to log.

use libcatlog::{formatter, Context, Config, Level};

#[test]
fn first_logging_thread_is_zero() {
    let snapshot = Config::default()
        .with_format("[{level}][T{thread}]")
        .unwrap()
        .snapshot();

    let context = Context::make("boot", Level::Error);
    assert_eq!(formatter::render("ignored", &context, &snapshot), "[E][T0]\n");

    let again = Context::make("boot", Level::Info);
    assert_eq!(again.thread_id(), 0);

    let other = std::thread::spawn(|| Context::make("worker", Level::Info).thread_id())
        .join()
        .unwrap();
    assert_eq!(other, 1);
}
