//! Ordered concurrent map with bounded in-flight work.
//!
//! ```text
//!  batch-reader thread          rayon pool             caller thread
//!  ───────────────────          ──────────             ─────────────
//!  acquire slot ──┐
//!  read batch     │  spawn ──►  transform(i) ──┐
//!  queue rx(i) ───┼──────────────────────────► │ ──►  recv rx(0), rx(1), ...
//!                 └──────────── release slot ◄─┴────  consume(i)
//! ```
//!
//! Tasks may finish in any order; results are always consumed in the order
//! they were read.

use crate::core::BatchIndex;
use crate::error::{AudioError, AudioResult};
use crossbeam::channel::{self, Receiver, Sender};
use log::debug;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// A queued task: either its pending result, or a read failure in its place
enum Pending<U> {
    Task(BatchIndex, Receiver<AudioResult<U>>),
    Failed(AudioError),
}

/// Runs a transform over a stream of indexed items on a worker pool and
/// hands the results back in input order.
///
/// At most `capacity` items are outstanding (read but not yet consumed) at
/// any time; the reader blocks before reading further until the consumer
/// catches up.
pub struct OrderedScheduler {
    pool: rayon::ThreadPool,
    capacity: usize,
}

impl OrderedScheduler {
    /// Create a scheduler with `workers` pool threads and a queue of `capacity`
    pub fn new(workers: usize, capacity: usize) -> AudioResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("modifier-{}", i))
            .build()
            .map_err(|e| AudioError::ProcessingError(format!("Failed to create worker pool: {}", e)))?;

        Ok(OrderedScheduler {
            pool,
            capacity: capacity.max(1),
        })
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Maximum number of outstanding items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drive `input` through `transform` and feed results to `consume` in order.
    ///
    /// `input` is pulled on a dedicated reader thread. The first error, from
    /// the input, a transform or `consume`, stops the run and is returned
    /// once everything before it has been consumed. Returns the number of
    /// items consumed.
    pub fn run<T, U, I, F, C>(&self, input: I, transform: F, mut consume: C) -> AudioResult<u64>
    where
        I: Iterator<Item = AudioResult<(BatchIndex, T)>> + Send,
        T: Send + 'static,
        U: Send + 'static,
        F: Fn(T, BatchIndex) -> AudioResult<U> + Send + Sync + 'static,
        C: FnMut(BatchIndex, U) -> AudioResult<()>,
    {
        let transform = Arc::new(transform);
        let (slot_tx, slot_rx) = channel::bounded::<()>(self.capacity);
        let (pending_tx, pending_rx) = channel::bounded::<Pending<U>>(self.capacity);

        thread::scope(|scope| {
            let reader = thread::Builder::new()
                .name("batch-reader".to_string())
                .spawn_scoped(scope, move || self.produce(input, transform, slot_tx, pending_tx))?;

            // Dropping the receivers on return unblocks the reader
            let consumed = Self::deliver(pending_rx, slot_rx, &mut consume);

            reader
                .join()
                .map_err(|_| AudioError::ProcessingError("Batch reader thread panicked".to_string()))?;
            consumed
        })
    }

    fn produce<T, U, I, F>(
        &self,
        mut input: I,
        transform: Arc<F>,
        slots: Sender<()>,
        pending: Sender<Pending<U>>,
    ) where
        I: Iterator<Item = AudioResult<(BatchIndex, T)>>,
        T: Send + 'static,
        U: Send + 'static,
        F: Fn(T, BatchIndex) -> AudioResult<U> + Send + Sync + 'static,
    {
        loop {
            // Blocks while `capacity` items are outstanding
            if slots.send(()).is_err() {
                debug!("Consumer stopped, abandoning remaining input");
                return;
            }

            let (index, item) = match input.next() {
                None => return,
                Some(Ok(next)) => next,
                Some(Err(e)) => {
                    let _ = pending.send(Pending::Failed(e));
                    return;
                }
            };

            let (result_tx, result_rx) = channel::bounded(1);
            if pending.send(Pending::Task(index, result_rx)).is_err() {
                return;
            }

            let transform = Arc::clone(&transform);
            self.pool.spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| (*transform)(item, index)))
                    .unwrap_or_else(|payload| {
                        Err(AudioError::TransformFailed {
                            index,
                            message: panic_message(&*payload),
                        })
                    });
                // The consumer may already have given up
                let _ = result_tx.send(result);
            });
        }
    }

    fn deliver<U, C>(pending: Receiver<Pending<U>>, slots: Receiver<()>, consume: &mut C) -> AudioResult<u64>
    where
        C: FnMut(BatchIndex, U) -> AudioResult<()>,
    {
        let mut consumed = 0;
        for next in pending.iter() {
            let (index, result_rx) = match next {
                Pending::Task(index, result_rx) => (index, result_rx),
                Pending::Failed(e) => return Err(e),
            };

            let output = result_rx.recv().map_err(|_| AudioError::TransformFailed {
                index,
                message: "worker exited without a result".to_string(),
            })??;
            consume(index, output)?;
            consumed += 1;

            // Free the slot only after the item has been fully consumed
            let _ = slots.recv();
        }
        Ok(consumed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn indexed(count: u64) -> impl Iterator<Item = AudioResult<(BatchIndex, u64)>> + Send {
        (0..count).map(|i| Ok((BatchIndex::new(i), i)))
    }

    #[test]
    fn test_order_preserved_under_random_delays() {
        let scheduler = OrderedScheduler::new(4, 6).unwrap();

        for seed in [3u64, 7, 11, 17, 29] {
            let mut seen = Vec::new();
            let consumed = scheduler
                .run(
                    indexed(40),
                    move |item, _index| {
                        // Pseudo-random delay so later items often finish first
                        let delay = (item.wrapping_mul(seed).wrapping_add(seed * 31)) % 9;
                        thread::sleep(Duration::from_millis(delay));
                        Ok(item * 10)
                    },
                    |index, output| {
                        seen.push((index.get(), output));
                        Ok(())
                    },
                )
                .unwrap();

            assert_eq!(consumed, 40);
            let expected: Vec<_> = (0..40).map(|i| (i, i * 10)).collect();
            assert_eq!(seen, expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_reverse_completion_order() {
        // Earlier items take longest, so they always complete last
        let scheduler = OrderedScheduler::new(8, 8).unwrap();
        let mut seen = Vec::new();
        scheduler
            .run(
                indexed(8),
                |item, _index| {
                    thread::sleep(Duration::from_millis((8 - item) * 5));
                    Ok(item)
                },
                |_index, output| {
                    seen.push(output);
                    Ok(())
                },
            )
            .unwrap();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_backpressure_bounds_outstanding() {
        const CAPACITY: usize = 3;
        let scheduler = OrderedScheduler::new(4, CAPACITY).unwrap();

        let read = Arc::new(AtomicUsize::new(0));
        let consumed = Arc::new(AtomicUsize::new(0));
        let max_outstanding = Arc::new(AtomicUsize::new(0));

        let input = {
            let read = Arc::clone(&read);
            let consumed = Arc::clone(&consumed);
            let max_outstanding = Arc::clone(&max_outstanding);
            (0..30u64).map(move |i| {
                let now_read = read.fetch_add(1, Ordering::SeqCst) + 1;
                let outstanding = now_read - consumed.load(Ordering::SeqCst);
                max_outstanding.fetch_max(outstanding, Ordering::SeqCst);
                Ok::<_, AudioError>((BatchIndex::new(i), i))
            })
        };

        scheduler
            .run(
                input,
                |item, _index| {
                    thread::sleep(Duration::from_millis(3));
                    Ok(item)
                },
                |_index, _output| {
                    // Slow consumer
                    thread::sleep(Duration::from_millis(5));
                    consumed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )
            .unwrap();

        assert_eq!(read.load(Ordering::SeqCst), 30);
        let max = max_outstanding.load(Ordering::SeqCst);
        assert!(max <= CAPACITY, "{} outstanding with capacity {}", max, CAPACITY);
    }

    #[test]
    fn test_transform_failure_stops_in_order() {
        let scheduler = OrderedScheduler::new(4, 4).unwrap();
        let mut seen = Vec::new();

        let result = scheduler.run(
            indexed(100),
            |item, index| {
                if item == 3 {
                    return Err(AudioError::TransformFailed {
                        index,
                        message: "boom".to_string(),
                    });
                }
                // Later items finish before the failing one
                thread::sleep(Duration::from_millis(if item < 3 { 10 } else { 0 }));
                Ok(item)
            },
            |_index, output| {
                seen.push(output);
                Ok(())
            },
        );

        assert!(matches!(
            result,
            Err(AudioError::TransformFailed { index, .. }) if index == BatchIndex::new(3)
        ));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_transform_panic_is_failure() {
        let scheduler = OrderedScheduler::new(2, 2).unwrap();
        let result = scheduler.run(
            indexed(5),
            |item, _index| {
                if item == 1 {
                    panic!("bad modifier");
                }
                Ok(item)
            },
            |_index, _output| Ok(()),
        );

        match result {
            Err(AudioError::TransformFailed { index, message }) => {
                assert_eq!(index, BatchIndex::new(1));
                assert!(message.contains("bad modifier"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_input_error_delivered_after_earlier_items() {
        let scheduler = OrderedScheduler::new(2, 4).unwrap();
        let input = (0..10u64).map(|i| {
            if i == 4 {
                Err(AudioError::DecodeError("truncated".to_string()))
            } else {
                Ok((BatchIndex::new(i), i))
            }
        });

        let mut seen = Vec::new();
        let result = scheduler.run(input, |item, _index| Ok(item), |_index, output| {
            seen.push(output);
            Ok(())
        });

        assert!(matches!(result, Err(AudioError::DecodeError(_))));
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_consumer_failure_cancels_reader() {
        let scheduler = OrderedScheduler::new(2, 2).unwrap();
        let read = Arc::new(Mutex::new(0u64));

        let input = {
            let read = Arc::clone(&read);
            (0..1_000_000u64).map(move |i| {
                *read.lock().unwrap() += 1;
                Ok::<_, AudioError>((BatchIndex::new(i), i))
            })
        };

        let result = scheduler.run(input, |item, _index| Ok(item), |index, _output| {
            if index.get() == 5 {
                return Err(AudioError::EncodeError("sink full".to_string()));
            }
            Ok(())
        });

        assert!(matches!(result, Err(AudioError::EncodeError(_))));
        // The reader stopped shortly after the failure instead of draining the input
        assert!(*read.lock().unwrap() <= 5 + 1 + 2);
    }

    #[test]
    fn test_empty_input() {
        let scheduler = OrderedScheduler::new(2, 2).unwrap();
        let consumed = scheduler
            .run(indexed(0), |item, _index| Ok(item), |_index, _output: u64| Ok(()))
            .unwrap();
        assert_eq!(consumed, 0);
    }
}
