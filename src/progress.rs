//! Progress reporting: a minimal tick interface the pool drives, plus
//! terminal, null, and counter implementations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

/// Observer for per-element progress. Invoked from the driving thread only,
/// once per completed element (once per started element on the sequential
/// path). Purely observational: implementations must not affect control flow.
pub trait ProgressReporter {
    fn on_tick(&self, completed: usize, total: usize);
}

/// Reporter that does nothing. For embedding in quiet contexts.
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn on_tick(&self, _completed: usize, _total: usize) {}
}

/// Terminal progress bar on stderr. Renders nothing when stderr is not a TTY.
pub struct TerminalProgress {
    bar: ProgressBar,
    leave: bool,
}

impl TerminalProgress {
    /// `leave` keeps the finished bar on screen; otherwise it is cleared.
    pub fn new(total: usize, leave: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} ({elapsed})")
                .unwrap(),
        );
        Self { bar, leave }
    }

    fn close(&self) {
        if self.bar.is_finished() {
            return;
        }
        if self.leave {
            self.bar.finish();
        } else {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalProgress {
    fn on_tick(&self, completed: usize, total: usize) {
        self.bar.set_position(completed as u64);
        if completed >= total {
            self.close();
        }
    }
}

impl Drop for TerminalProgress {
    // An error abort skips the final tick; the bar must still be closed out.
    fn drop(&mut self) {
        self.close();
    }
}

/// Reporter that records the latest completed count in a shared atomic.
/// Clones observe the same counter, so a handle kept by the caller stays
/// readable after the pool has consumed its twin.
#[derive(Clone, Default)]
pub struct CountingProgress {
    ticks: Arc<AtomicUsize>,
}

impl CountingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest completed count reported to this counter.
    pub fn completed(&self) -> usize {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for CountingProgress {
    fn on_tick(&self, completed: usize, _total: usize) {
        self.ticks.store(completed, Ordering::Relaxed);
    }
}
