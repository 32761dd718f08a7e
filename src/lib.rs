//! Bounded parallel map over finite collections.
//!
//! One entry point, three execution paths: inline sequential when the
//! effective worker count is below 2, a shared-memory thread pool, or an
//! isolated-state pool where nothing is shared behind the call. Concurrent
//! results arrive in completion order, sequential results in input order.
//! Per-element results are `Option`s; a batch where every element produced
//! `None` returns no value at all, so purely side-effecting callers get
//! nothing to ignore.
//!
//! ```no_run
//! use parmap::Parallel;
//!
//! let doubled = Parallel::new()
//!     .max_workers(4)
//!     .run(|x: i32| Ok::<_, String>(Some(x * 2)), vec![1, 2, 3, 4])?;
//! // Some permutation of [2, 4, 6, 8], each wrapped in Some.
//! assert_eq!(doubled.map(|v| v.len()), Some(4));
//! # Ok::<(), String>(())
//! ```

pub mod config;
pub mod pool;
pub mod progress;

use std::convert::Infallible;

pub use config::{detected_cpus, resolve_workers};
pub use pool::ExecMode;
pub use progress::{CountingProgress, NullProgress, ProgressReporter, TerminalProgress};

/// Configuration for one parallel run. Defaults mirror `parallel`: worker
/// count auto-resolved, shared-memory mode, progress bar cleared on
/// completion.
pub struct Parallel {
    max_workers: Option<usize>,
    use_threads: bool,
    leave: bool,
    reporter: Option<Box<dyn ProgressReporter>>,
}

impl Default for Parallel {
    fn default() -> Self {
        Self {
            max_workers: None,
            use_threads: true,
            leave: false,
            reporter: None,
        }
    }
}

impl Parallel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on live concurrent tasks. Unset means the `PARMAP_WORKERS`
    /// env override, else the detected CPU count. Values below 2 select the
    /// sequential path.
    pub fn max_workers(mut self, count: usize) -> Self {
        self.max_workers = Some(count);
        self
    }

    /// Shared-memory workers (`true`, default) vs isolated-state workers.
    /// Ignored when the effective worker count is below 2.
    pub fn use_threads(mut self, use_threads: bool) -> Self {
        self.use_threads = use_threads;
        self
    }

    /// Keep the progress bar on screen after completion.
    pub fn leave(mut self, leave: bool) -> Self {
        self.leave = leave;
        self
    }

    /// Replace the default terminal bar with a caller-supplied reporter.
    pub fn reporter(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Disable progress reporting entirely.
    pub fn quiet(self) -> Self {
        self.reporter(NullProgress)
    }

    /// Apply `func` to every element. Returns `Err` with the first retrieved
    /// task error, `Ok(None)` when every element produced `None`, otherwise
    /// `Ok(Some(results))` with one entry per element — input order on the
    /// sequential path, completion order on the concurrent ones.
    pub fn run<I, O, E, F>(&self, func: F, items: Vec<I>) -> Result<Option<Vec<Option<O>>>, E>
    where
        I: Send,
        O: Send,
        E: Send,
        F: Fn(I) -> Result<Option<O>, E> + Clone + Send + Sync,
    {
        let workers = config::resolve_workers(self.max_workers);
        let total = items.len();
        let results = match &self.reporter {
            Some(reporter) => pool::execute(func, items, workers, self.use_threads, reporter.as_ref())?,
            None => {
                let bar = TerminalProgress::new(total, self.leave);
                pool::execute(func, items, workers, self.use_threads, &bar)?
            }
        };
        Ok(collapse(results))
    }
}

/// Parallel map with default configuration; see [`Parallel`] for the knobs.
pub fn parallel<I, O, E, F>(func: F, items: Vec<I>) -> Result<Option<Vec<Option<O>>>, E>
where
    I: Send,
    O: Send,
    E: Send,
    F: Fn(I) -> Result<Option<O>, E> + Clone + Send + Sync,
{
    Parallel::new().run(func, items)
}

/// Infallible parallel map over the same pool: no sentinel contract, no
/// progress bar, one output per input in completion order (input order when
/// the pool degrades to sequential).
pub fn parallel_map<I, O, F>(func: F, items: Vec<I>, max_workers: Option<usize>) -> Vec<O>
where
    I: Send,
    O: Send,
    F: Fn(I) -> O + Clone + Send + Sync,
{
    let workers = config::resolve_workers(max_workers);
    let outcome = pool::execute::<_, _, Infallible, _>(
        move |item| Ok(func(item)),
        items,
        workers,
        true,
        &NullProgress,
    );
    match outcome {
        Ok(results) => results,
        Err(never) => match never {},
    }
}

/// The return-value contract: a batch where no element produced a value
/// collapses to no value at all. One pass, position-preserving otherwise.
fn collapse<O>(results: Vec<Option<O>>) -> Option<Vec<Option<O>>> {
    if results.iter().any(Option::is_some) {
        Some(results)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_all_none() {
        assert_eq!(collapse::<i32>(vec![None, None, None]), None);
        assert_eq!(collapse::<i32>(vec![]), None);
    }

    #[test]
    fn test_collapse_preserves_positions() {
        assert_eq!(
            collapse(vec![None, Some(2), None]),
            Some(vec![None, Some(2), None])
        );
    }

    #[test]
    fn test_parallel_map_contents() {
        let out = parallel_map(|x: i32| x * 2, (0..50).collect(), Some(4));
        let mut sorted = out;
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_map_sequential_order() {
        let out = parallel_map(|x: i32| x * 2, vec![3, 1, 2], Some(1));
        assert_eq!(out, vec![6, 2, 4]);
    }
}
