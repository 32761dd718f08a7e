//! Isolated-state worker pool: the stand-in for process isolation.
//!
//! Nothing is shared behind the call. Each worker owns its own clone of the
//! function, each element is moved into exactly one worker, and each result is
//! moved back out — `Clone + Send` bounds are the compile-time form of
//! "transferable across the isolation boundary". The submission queue is a
//! mutex-protected deque rather than a shared channel endpoint.

use std::collections::VecDeque;
use std::sync::{mpsc, Mutex};
use std::thread;

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
    F: Fn(I) -> Result<R, E> + Clone + Send,
{
    let total = items.len();
    let workers = worker_count.min(total).max(1);

    // Fully loaded before any worker starts; no further submission.
    let queue = Mutex::new(VecDeque::from(items));
    let (result_tx, result_rx) = mpsc::channel::<Result<R, E>>();

    let mut results = Vec::with_capacity(total);
    let mut first_err: Option<E> = None;

    thread::scope(|s| {
        for _ in 0..workers {
            let task = func.clone();
            let result_tx = result_tx.clone();
            let queue = &queue;
            s.spawn(move || loop {
                // The lock guards only the pop; the task runs unlocked.
                let item = queue.lock().unwrap().pop_front();
                match item {
                    Some(item) => {
                        let _ = result_tx.send(task(item));
                    }
                    None => break,
                }
            });
        }
        drop(result_tx);

        for n in 1..=total {
            let outcome = match result_rx.recv() {
                Ok(outcome) => outcome,
                // Senders gone early: a task panicked; the scope re-raises it.
                Err(_) => break,
            };
            reporter.on_tick(n, total);
            match outcome {
                Ok(r) => results.push(r),
                Err(e) => {
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
