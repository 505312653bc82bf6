//! File-watch task runner.
//!
//! Watches a directory tree and, when a file selected by the [`Trigger`]
//! changes, runs a shell command (by default an `oc rsync` into a running
//! pod). The loop is blocking and strictly sequential: a burst of changes
//! collapses into one run after a quiet period, and runs never overlap.

pub mod command;
pub mod trigger;

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::Result;
use crate::config;

pub use command::CommandTemplate;
pub use trigger::Trigger;

/// How often the loop checks the stop flag while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on the quiet-period wait under a continuous event stream.
const MAX_SETTLE: Duration = Duration::from_secs(5);

/// A configured watch-and-run loop.
#[derive(Debug, Clone)]
pub struct Runner {
    root: PathBuf,
    trigger: Trigger,
    command: String,
    debounce: Duration,
}

impl Runner {
    /// `command` is run verbatim with `sh -c` in `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        trigger: Trigger,
        command: impl Into<String>,
        debounce: Duration,
    ) -> Self {
        Self {
            root: root.into(),
            trigger,
            command: command.into(),
            debounce,
        }
    }

    /// Build from config, rendering the command template against the
    /// configured target.
    pub fn from_config(cfg: &config::Sync) -> Result<Self> {
        let command = CommandTemplate::new(cfg.command.as_str()).render(Some(&cfg.pod))?;
        Ok(Self::new(
            cfg.root.clone(),
            Trigger::from_config(cfg)?,
            command,
            Duration::from_millis(cfg.debounce_ms),
        ))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `event` touches a triggering path under `root`.
    pub fn is_relevant(&self, root: &Path, event: &Event) -> bool {
        let kind_matches = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        );
        kind_matches
            && event.paths.iter().any(|path| {
                path.strip_prefix(root)
                    .map(|relative| self.trigger.matches(relative))
                    .unwrap_or(false)
            })
    }

    /// Watch until `stop` is set. Returns how many times the command ran.
    pub fn run(&self, stop: &AtomicBool) -> Result<usize> {
        let root = self.root.canonicalize()?;
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!(root = %root.display(), command = %self.command, "Watching for changes");

        let mut runs = 0;
        while !stop.load(Ordering::Relaxed) {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) if self.is_relevant(&root, &event) => {
                    debug!(paths = ?event.paths, "Change detected");
                    self.settle(&rx);
                    self.execute(&root)?;
                    runs += 1;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("Watch error: {e}"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(runs)
    }

    /// Drain events until `debounce` passes without one.
    fn settle(&self, rx: &Receiver<notify::Result<Event>>) {
        let deadline = Instant::now() + MAX_SETTLE;
        while Instant::now() < deadline {
            match rx.recv_timeout(self.debounce) {
                Ok(_) => continue,
                Err(_) => break,
            }
        }
    }

    /// Run the command once, in `root`. A failing command is logged, not
    /// returned as an error.
    pub fn execute(&self, root: &Path) -> Result<ExitStatus> {
        info!(command = %self.command, "Running sync command");
        let status = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(root)
            .status()?;
        if status.success() {
            info!("Sync command finished");
        } else {
            warn!(%status, "Sync command failed");
        }
        Ok(status)
    }
}
