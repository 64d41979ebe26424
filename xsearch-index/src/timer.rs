//! Hierarchical wall-clock timers.
//!
//! A [`Timer`] is a named node with a start instant, an elapsed duration once
//! stopped, and child timers. Callers hand a parent timer down the pipeline
//! and each stage opens child scopes under it, so the finished tree reports
//! where a request spent its time.

use parking_lot::Mutex;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct TimerNode {
    name: String,
    started: Instant,
    elapsed: Mutex<Option<Duration>>,
    children: Mutex<Vec<Timer>>,
}

/// Shared handle to a timer node.
#[derive(Clone)]
pub struct Timer {
    node: Arc<TimerNode>,
}

impl Timer {
    /// Start a new root timer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            node: Arc::new(TimerNode {
                name: name.into(),
                started: Instant::now(),
                elapsed: Mutex::new(None),
                children: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Start a child timer nested under this one.
    pub fn child(&self, name: impl Into<String>) -> Timer {
        let child = Timer::new(name);
        self.node.children.lock().push(child.clone());
        child
    }

    /// Start a child timer that stops when the returned guard drops.
    pub fn scope(&self, name: impl Into<String>) -> TimerScope {
        TimerScope {
            timer: self.child(name),
        }
    }

    /// Stop the timer. Idempotent: later calls return the first duration.
    pub fn stop(&self) -> Duration {
        *self
            .node
            .elapsed
            .lock()
            .get_or_insert_with(|| self.node.started.elapsed())
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Elapsed time, or `None` while the timer is running.
    pub fn elapsed(&self) -> Option<Duration> {
        *self.node.elapsed.lock()
    }

    pub fn is_stopped(&self) -> bool {
        self.elapsed().is_some()
    }

    pub fn children(&self) -> Vec<Timer> {
        self.node.children.lock().clone()
    }

    /// First timer named `name` in this subtree (depth first, self included).
    pub fn find(&self, name: &str) -> Option<Timer> {
        if self.name() == name {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    /// Indented, one line per timer.
    pub fn report(&self) -> String {
        let mut out = String::new();
        self.write_report(&mut out, 0);
        out
    }

    fn write_report(&self, out: &mut String, depth: usize) {
        let _ = match self.elapsed() {
            Some(elapsed) => writeln!(
                out,
                "{:indent$}{}: {:.3} ms",
                "",
                self.name(),
                elapsed.as_secs_f64() * 1000.0,
                indent = depth * 2
            ),
            None => writeln!(out, "{:indent$}{}: running", "", self.name(), indent = depth * 2),
        };
        for child in self.children() {
            child.write_report(out, depth + 1);
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.node.name)
            .field("elapsed", &self.elapsed())
            .field("children", &self.node.children.lock().len())
            .finish()
    }
}

/// Guard that stops its timer when dropped, including during unwinding or
/// early `?` returns.
#[derive(Debug)]
pub struct TimerScope {
    timer: Timer,
}

impl TimerScope {
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Stop now and return the elapsed time.
    pub fn finish(self) -> Duration {
        self.timer.stop()
    }
}

impl Drop for TimerScope {
    fn drop(&mut self) {
        let elapsed = self.timer.stop();
        tracing::trace!(
            timer = %self.timer.name(),
            ms = (elapsed.as_secs_f64() * 1000.0) as u64,
            "timer closed"
        );
    }
}
