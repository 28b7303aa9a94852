//! Fixed-size worker pool over a shared work queue
//!
//! Workers are scoped threads pulling items from an `mpsc` channel whose
//! receiver is shared behind a mutex. Each worker owns a private
//! `PartialResult`; nothing is shared between workers except the queue and
//! whatever lock tables the work closure borrows.
//!
//! # Suspension Points
//!
//! A worker blocks only while waiting for the queue (next item or closure) or
//! inside the work closure while waiting for a ledger/bucket lock.
//!
//! # Limitations
//!
//! There is no cancellation or timeout: `run` returns once the queue is
//! drained and every worker has exited.

use crate::core::aggregator::PartialResult;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::trace;

/// Fixed pool of worker threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Dispatch every item to exactly one worker and collect the partials
    ///
    /// # Arguments
    ///
    /// * `items` - Work items; each is moved to exactly one worker
    /// * `work` - Called once per item with the worker's private accumulator
    ///
    /// # Returns
    ///
    /// One `PartialResult` per worker, in worker order.
    ///
    /// # Panics
    ///
    /// A panic inside `work` is re-raised on the calling thread once the
    /// pool joins.
    pub fn run<T, I, F>(&self, items: I, work: F) -> Vec<PartialResult>
    where
        T: Send,
        I: IntoIterator<Item = T>,
        F: Fn(T, &mut PartialResult) + Sync,
    {
        let (sender, receiver) = mpsc::channel::<T>();
        let queue = Mutex::new(receiver);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker_id| {
                    let queue = &queue;
                    let work = &work;
                    scope.spawn(move || {
                        let mut partial = PartialResult::default();
                        let mut handled = 0usize;
                        loop {
                            // The queue guard is a temporary: it is released
                            // before the item is worked on.
                            let next = queue
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .recv();
                            let Ok(item) = next else {
                                break;
                            };
                            work(item, &mut partial);
                            handled += 1;
                        }
                        trace!(worker_id, handled, "worker finished");
                        partial
                    })
                })
                .collect();

            for item in items {
                // Sending only fails once every worker has exited
                if sender.send(item).is_err() {
                    break;
                }
            }
            // Closing the queue lets idle workers leave their loop
            drop(sender);

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_zero_workers_becomes_one() {
        assert_eq!(WorkerPool::new(0).workers(), 1);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(8)]
    #[case(64)]
    fn test_every_item_is_handled_exactly_once(#[case] workers: usize) {
        let pool = WorkerPool::new(workers);
        let seen: Vec<AtomicUsize> = (0..500).map(|_| AtomicUsize::new(0)).collect();

        let partials = pool.run(0..500usize, |item, partial| {
            seen[item].fetch_add(1, Ordering::SeqCst);
            partial.processed += 1;
        });

        assert_eq!(partials.len(), workers);
        assert_eq!(partials.iter().map(|p| p.processed).sum::<usize>(), 500);
        assert!(seen.iter().all(|count| count.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn test_items_can_be_mutable_borrows() {
        let mut values = vec![0u32; 100];
        let pool = WorkerPool::new(4);

        pool.run(values.iter_mut(), |value, _| *value += 1);

        assert!(values.iter().all(|&v| v == 1));
    }

    #[test]
    fn test_empty_queue() {
        let partials = WorkerPool::new(3).run(Vec::<u8>::new(), |_, _| unreachable!());
        assert_eq!(partials.len(), 3);
        assert!(partials.iter().all(|p| *p == PartialResult::default()));
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_worker_panic_is_propagated() {
        WorkerPool::new(2).run(0..10, |item, _| {
            if item == 5 {
                panic!("boom");
            }
        });
    }
}
