//! Sync runner with a real filesystem watcher.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use canary::{Runner, Trigger};

fn wait_for(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if path.exists() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    path.exists()
}

#[test]
fn runs_once_per_matching_change() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let marker = out.path().join("marker");

    std::fs::write(root.path().join("notes.txt"), "v1").unwrap();
    std::fs::write(root.path().join("lib.rs"), "v1").unwrap();

    let runner = Runner::new(
        root.path(),
        Trigger::globs(&["*.rs"]).unwrap(),
        format!("echo run >> '{}'", marker.display()),
        Duration::from_millis(200),
    );

    let stop = Arc::new(AtomicBool::new(false));
    let handle = thread::spawn({
        let stop = Arc::clone(&stop);
        move || runner.run(&stop)
    });

    // Let the watcher register before touching anything.
    thread::sleep(Duration::from_millis(500));

    std::fs::write(root.path().join("notes.txt"), "v2").unwrap();
    thread::sleep(Duration::from_millis(600));
    assert!(!marker.exists(), "non-matching change triggered a run");

    std::fs::write(root.path().join("lib.rs"), "v2").unwrap();
    assert!(
        wait_for(&marker, Duration::from_secs(5)),
        "matching change did not trigger a run"
    );

    thread::sleep(Duration::from_millis(300));
    stop.store(true, Ordering::Relaxed);
    let runs = handle.join().unwrap().unwrap();

    assert_eq!(runs, 1);
    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "run\n");
}

#[test]
fn stops_promptly_when_idle() {
    let root = tempfile::tempdir().unwrap();
    let runner = Runner::new(
        root.path(),
        Trigger::files(["app.rs"]),
        "true",
        Duration::from_millis(50),
    );

    let stop = Arc::new(AtomicBool::new(false));
    let handle = thread::spawn({
        let stop = Arc::clone(&stop);
        move || runner.run(&stop)
    });

    thread::sleep(Duration::from_millis(200));
    let stopped_at = Instant::now();
    stop.store(true, Ordering::Relaxed);
    let runs = handle.join().unwrap().unwrap();

    assert_eq!(runs, 0);
    assert!(stopped_at.elapsed() < Duration::from_secs(2));
}

#[test]
fn missing_root_is_an_error() {
    let runner = Runner::new(
        "/nonexistent/canary-watch-root",
        Trigger::files(["a"]),
        "true",
        Duration::ZERO,
    );
    assert!(runner.run(&AtomicBool::new(false)).is_err());
}
