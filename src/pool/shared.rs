//! Shared-memory worker pool over crossbeam channels.
//!
//! Every task is queued before any result is awaited; results come back on a
//! second channel in completion order. Workers borrow one `&func` (hence
//! `F: Sync`) — thread-safety of whatever it captures is the caller's problem.

use std::thread;

use crossbeam_channel::unbounded;

use crate::progress::ProgressReporter;

pub fn run<I, R, E, F>(
    func: F,
    items: Vec<I>,
    worker_count: usize,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<R>, E>
where
    I: Send,
    R: Send,
    E: Send,
    F: Fn(I) -> Result<R, E> + Sync,
{
    let total = items.len();
    let workers = worker_count.min(total).max(1);

    let (task_tx, task_rx) = unbounded::<I>();
    let (result_tx, result_rx) = unbounded::<Result<R, E>>();

    // Submit everything up front; workers see a closed, fully loaded queue.
    for item in items {
        let _ = task_tx.send(item);
    }
    drop(task_tx);

    let mut results = Vec::with_capacity(total);
    let mut first_err: Option<E> = None;

    thread::scope(|s| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let func = &func;
            s.spawn(move || {
                while let Ok(item) = task_rx.recv() {
                    let _ = result_tx.send(func(item));
                }
            });
        }
        // Only worker clones may keep the result channel open, so the
        // collection loop can observe disconnection if workers die early.
        drop(result_tx);
        drop(task_rx);

        for n in 1..=total {
            let outcome = match result_rx.recv() {
                Ok(outcome) => outcome,
                // All workers gone before `total` results: a task panicked.
                // The scope re-raises that panic once the rest are joined.
                Err(_) => break,
            };
            reporter.on_tick(n, total);
            match outcome {
                Ok(r) => results.push(r),
                Err(e) => {
                    // First retrieved error wins. Outstanding tasks are not
                    // cancelled; workers drain the queue and the scope joins
                    // them on the way out.
                    first_err = Some(e);
                    break;
                }
            }
        }
    });

    match first_err {
        Some(e) => Err(e),
        None => Ok(results),
    }
}
