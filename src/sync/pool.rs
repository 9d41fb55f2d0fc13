//! Bounded worker pool.
//!
//! Design:
//! - **Feeder:** one thread pushes jobs into a bounded channel and blocks
//!   while all workers are busy.
//! - **Workers:** `workers` threads take jobs from the channel and send each
//!   result back over a second channel.
//! - **Collector:** the calling thread drains the result channel and hands
//!   every result to a callback, so aggregation needs no shared state.
//!
//! Results arrive in completion order, not submission order.

use std::thread;

use crossbeam_channel::{bounded, unbounded};

/// A fixed-size pool of worker threads scoped to one [`WorkerPool::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool with `workers` threads (at least one).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `work` on every job and passes each result to `collect`.
    ///
    /// Returns once every job has completed and its result was collected.
    pub fn run<J, R, W, C>(&self, jobs: Vec<J>, work: W, mut collect: C)
    where
        J: Send,
        R: Send,
        W: Fn(J) -> R + Sync,
        C: FnMut(R),
    {
        let (job_tx, job_rx) = bounded::<J>(self.workers);
        let (result_tx, result_rx) = unbounded::<R>();
        let work = &work;

        thread::scope(|scope| {
            scope.spawn(move || {
                for job in jobs {
                    if job_tx.send(job).is_err() {
                        break;
                    }
                }
            });

            for _ in 0..self.workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for job in job_rx {
                        if result_tx.send(work(job)).is_err() {
                            break;
                        }
                    }
                });
            }
            // Workers hold the remaining senders; the loop below ends when they finish
            drop(result_tx);
            drop(job_rx);

            for result in result_rx {
                collect(result);
            }
        });
    }
}
