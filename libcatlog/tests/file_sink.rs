use libcatlog::{Context, FileSink, Level, Sink};
use std::fs;
use std::thread;

#[test]
fn existing_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.log");
    fs::write(&path, "stale line one\nstale line two\n").unwrap();

    let sink = FileSink::new(&path).unwrap();
    assert!(!path.exists());
    sink.handle("fresh\n", &Context::make("boot", Level::Info));
    drop(sink);

    assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
}

#[test]
fn concurrent_lines_arrive_whole() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stress.log");
    let sink = FileSink::new(&path).unwrap();

    let expected_bytes: usize = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let sink = &sink;
                scope.spawn(move || {
                    let mut written = 0;
                    for i in 0..PER_THREAD {
                        // Vary the length so torn writes would be visible
                        let line = format!("t{}-{}-{}\n", t, i, "x".repeat(i % 17));
                        sink.handle(&line, &Context::make("stress", Level::Debug));
                        written += line.len();
                    }
                    written
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).sum()
    });
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.len(), expected_bytes);

    let mut next = [0usize; THREADS];
    for line in contents.lines() {
        let mut parts = line.splitn(3, '-');
        let t: usize = parts.next().unwrap()[1..].parse().unwrap();
        let i: usize = parts.next().unwrap().parse().unwrap();
        assert_eq!(parts.next().unwrap(), "x".repeat(i % 17));
        // Lines from one thread keep their relative order
        assert_eq!(i, next[t]);
        next[t] += 1;
    }
    assert_eq!(next, [PER_THREAD; THREADS]);
}

#[test]
fn drop_flushes_pending_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shutdown.log");

    let sink = FileSink::new(&path).unwrap();
    let ctx = Context::make("shutdown", Level::Warn);
    for i in 0..1000 {
        sink.handle(&format!("{}\n", i), &ctx);
    }
    drop(sink);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1000);
    assert_eq!(contents.lines().last(), Some("999"));
}
