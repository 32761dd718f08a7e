//! Execution-mode selection and task dispatch.
//!
//! One call = one pool. Workers are scoped threads, so every exit path,
//! including error unwinding, joins them before the call returns.

mod isolated;
mod shared;

use crate::progress::ProgressReporter;

/// How a batch of tasks is executed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecMode {
    /// Inline on the calling thread, input order.
    Sequential,
    /// Worker threads sharing one address space and one borrowed function.
    Shared,
    /// Worker threads with nothing shared behind the call: per-worker function
    /// clones and move-only data. Substitute for process isolation.
    Isolated,
}

impl ExecMode {
    /// Fewer than 2 workers always degrades to sequential; `use_threads`
    /// only distinguishes the two concurrent modes.
    pub fn select(worker_count: usize, use_threads: bool) -> Self {
        if worker_count < 2 {
            ExecMode::Sequential
        } else if use_threads {
            ExecMode::Shared
        } else {
            ExecMode::Isolated
        }
    }
}

/// Run `func` once per element under the selected mode, ticking `reporter`
/// alongside. Returns results in input order (sequential) or completion order
/// (concurrent); the first retrieved error aborts the run.
pub fn execute<I, R, E, F>(
    func: F,
    items: Vec<I>,
    worker_count: usize,
    use_threads: bool,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<R>, E>
where
    I: Send,
    R: Send,
    E: Send,
    F: Fn(I) -> Result<R, E> + Clone + Send + Sync,
{
    let mode = ExecMode::select(worker_count, use_threads);
    log::debug!(
        "dispatching {} task(s) as {:?} with {} worker(s)",
        items.len(),
        mode,
        worker_count
    );
    match mode {
        ExecMode::Sequential => run_sequential(func, items, reporter),
        ExecMode::Shared => shared::run(func, items, worker_count, reporter),
        ExecMode::Isolated => isolated::run(func, items, worker_count, reporter),
    }
}

/// Inline loop: input order, fail fast on the first error. The reporter ticks
/// once per started element, so a failing element has already ticked.
fn run_sequential<I, R, E, F>(
    func: F,
    items: Vec<I>,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<R>, E>
where
    F: Fn(I) -> Result<R, E>,
{
    let total = items.len();
    let mut results = Vec::with_capacity(total);
    for (started, item) in items.into_iter().enumerate() {
        reporter.on_tick(started + 1, total);
        results.push(func(item)?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{CountingProgress, NullProgress};

    #[test]
    fn test_mode_select_degrades_below_two() {
        assert_eq!(ExecMode::select(0, true), ExecMode::Sequential);
        assert_eq!(ExecMode::select(1, true), ExecMode::Sequential);
        assert_eq!(ExecMode::select(0, false), ExecMode::Sequential);
        assert_eq!(ExecMode::select(1, false), ExecMode::Sequential);
    }

    #[test]
    fn test_mode_select_concurrent() {
        assert_eq!(ExecMode::select(2, true), ExecMode::Shared);
        assert_eq!(ExecMode::select(8, true), ExecMode::Shared);
        assert_eq!(ExecMode::select(2, false), ExecMode::Isolated);
    }

    #[test]
    fn test_sequential_preserves_input_order() {
        let out = run_sequential(
            |x: i32| Ok::<i32, String>(x * 2),
            vec![3, 1, 2],
            &NullProgress,
        )
        .unwrap();
        assert_eq!(out, vec![6, 2, 4]);
    }

    #[test]
    fn test_sequential_fails_fast() {
        let counter = CountingProgress::new();
        let out = run_sequential(
            |x: i32| {
                if x == 3 {
                    Err(format!("bad element {}", x))
                } else {
                    Ok(x)
                }
            },
            vec![1, 2, 3, 4],
            &counter,
        );
        assert_eq!(out, Err("bad element 3".to_string()));
        // Elements 1..=3 started, element 4 never ran.
        assert_eq!(counter.completed(), 3);
    }

    #[test]
    fn test_execute_routes_zero_workers_sequentially() {
        let out = execute(
            |x: i32| Ok::<i32, String>(x + 1),
            vec![1, 2, 3],
            0,
            true,
            &NullProgress,
        )
        .unwrap();
        assert_eq!(out, vec![2, 3, 4]);
    }
}
