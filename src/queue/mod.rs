//! Bounded multi-producer/multi-consumer queues
//!
//! The worker pool talks to its queue only through [`BoundedQueue`], so the
//! lock-based [`RingQueue`] and the channel-based [`ChannelQueue`] can be
//! swapped via [`QueueBackend`] without changing delivery behavior.
//!
//! Contract shared by every backend:
//! - `0 <= len() <= capacity()`; capacity 0 is legal and makes every push
//!   report overflow at once.
//! - Accepted items are popped in FIFO order.
//! - `push_overwrite` on a full queue evicts the oldest item and bumps the
//!   overrun counter; `push_or_discard` on a full queue hands the item back
//!   and bumps the discard counter. Both report the counter value their own
//!   loss produced, so concurrent producers never observe the same count.
//! - `push_blocking` with a zero timeout tries exactly once.

mod channel;
mod ring;

pub use channel::ChannelQueue;
pub use ring::RingQueue;

use crate::core::QueueMetrics;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub trait BoundedQueue<T: Send>: Send + Sync {
    /// Wait up to `timeout` for a free slot; on timeout the item is returned
    fn push_blocking(&self, item: T, timeout: Duration) -> Result<(), T>;

    /// [`BoundedQueue::push_blocking`] without touching the block metrics
    ///
    /// For callers that split one logical wait into several timed pushes and
    /// account for the wait themselves.
    fn push_within(&self, item: T, timeout: Duration) -> Result<(), T>;

    /// Enqueue without blocking, evicting the oldest item if full
    ///
    /// Returns the running overrun count if an item was lost to make room
    /// (for capacity 0 the lost item is the pushed one).
    fn push_overwrite(&self, item: T) -> Option<u64>;

    /// Enqueue without blocking, handing the item back if full
    fn push_or_discard(&self, item: T) -> Result<(), Rejected<T>>;

    /// Wait up to `timeout` for an item
    fn pop_blocking(&self, timeout: Duration) -> Option<T>;

    fn try_pop(&self) -> Option<T>;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn metrics(&self) -> &QueueMetrics;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn overrun_count(&self) -> u64 {
        self.metrics().overrun()
    }

    fn discard_count(&self) -> u64 {
        self.metrics().discarded()
    }

    fn reset_overrun_count(&self) {
        self.metrics().reset_overrun();
    }

    fn reset_discard_count(&self) {
        self.metrics().reset_discarded();
    }
}

/// Item refused by [`BoundedQueue::push_or_discard`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<T> {
    pub item: T,
    /// Running discard count including this rejection
    pub discarded: u64,
}

impl<T> Rejected<T> {
    pub fn into_inner(self) -> T {
        self.item
    }
}

/// Queue implementation used by a thread pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueBackend {
    /// Mutex-protected ring buffer with condition variables
    #[default]
    Ring,
    /// `crossbeam_channel::bounded` channel
    Channel,
}

impl QueueBackend {
    pub fn build<T: Send + 'static>(self, capacity: usize) -> Box<dyn BoundedQueue<T>> {
        match self {
            QueueBackend::Ring => Box::new(RingQueue::new(capacity)),
            QueueBackend::Channel => Box::new(ChannelQueue::new(capacity)),
        }
    }
}

/// `None` when the deadline is too far away to represent; callers then wait
/// without one
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const BACKENDS: [QueueBackend; 2] = [QueueBackend::Ring, QueueBackend::Channel];

    fn drain(queue: &dyn BoundedQueue<u32>) -> Vec<u32> {
        std::iter::from_fn(|| queue.try_pop()).collect()
    }

    #[test]
    fn test_overwrite_keeps_newest() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(4);
            let lost: Vec<_> = (1..=6).filter_map(|i| queue.push_overwrite(i)).collect();
            assert_eq!(lost, vec![1, 2], "{:?}", backend);
            assert_eq!(queue.len(), 4, "{:?}", backend);
            assert_eq!(queue.overrun_count(), 2, "{:?}", backend);
            assert_eq!(drain(&*queue), vec![3, 4, 5, 6], "{:?}", backend);
        }
    }

    #[test]
    fn test_discard_keeps_oldest() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(3);
            for i in 1..=3 {
                assert!(queue.push_or_discard(i).is_ok());
            }
            assert_eq!(
                queue.push_or_discard(4),
                Err(Rejected {
                    item: 4,
                    discarded: 1
                })
            );
            assert_eq!(queue.push_or_discard(5).unwrap_err().into_inner(), 5);

            assert_eq!(queue.len(), 3);
            assert_eq!(queue.discard_count(), 2, "{:?}", backend);
            assert_eq!(queue.overrun_count(), 0);
            assert_eq!(drain(&*queue), vec![1, 2, 3], "{:?}", backend);
        }
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(0);

            let started = Instant::now();
            assert_eq!(queue.push_blocking(1, Duration::from_secs(5)), Err(1));
            assert!(started.elapsed() < Duration::from_secs(1), "{:?}", backend);

            assert_eq!(queue.push_or_discard(2).unwrap_err().discarded, 1);
            assert_eq!(queue.push_overwrite(3), Some(1));

            assert_eq!(queue.len(), 0);
            assert_eq!(queue.discard_count(), 1);
            assert_eq!(queue.overrun_count(), 1);
            assert!(queue.try_pop().is_none());
        }
    }

    #[test]
    fn test_zero_timeout_push_does_not_wait() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(1);
            assert!(queue.push_blocking(1, Duration::ZERO).is_ok());

            let started = Instant::now();
            assert_eq!(queue.push_blocking(2, Duration::ZERO), Err(2));
            assert!(started.elapsed() < Duration::from_millis(500));
            assert_eq!(queue.metrics().block_timeouts(), 1, "{:?}", backend);
        }
    }

    #[test]
    fn test_pop_times_out_on_empty_queue() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(2);
            let started = Instant::now();
            assert!(queue.pop_blocking(Duration::from_millis(20)).is_none());
            assert!(started.elapsed() >= Duration::from_millis(15), "{:?}", backend);
        }
    }

    #[test]
    fn test_blocking_push_waits_for_consumer() {
        for backend in BACKENDS {
            let queue: Arc<dyn BoundedQueue<u32>> = Arc::from(backend.build::<u32>(2));
            queue.push_blocking(1, Duration::ZERO).unwrap();
            queue.push_blocking(2, Duration::ZERO).unwrap();

            let producer = {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let started = Instant::now();
                    let pushed = queue.push_blocking(3, Duration::from_secs(10)).is_ok();
                    (pushed, started.elapsed())
                })
            };

            thread::sleep(Duration::from_millis(50));
            assert_eq!(queue.len(), 2, "third push must still be waiting");
            assert_eq!(queue.pop_blocking(Duration::from_secs(1)), Some(1));

            let (pushed, waited) = producer.join().unwrap();
            assert!(pushed, "{:?}", backend);
            assert!(waited >= Duration::from_millis(40), "{:?}", backend);
            assert_eq!(drain(&*queue), vec![2, 3]);
        }
    }

    #[test]
    fn test_metrics_track_traffic() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(8);
            for i in 0..5 {
                queue.push_or_discard(i).unwrap();
            }
            queue.try_pop();
            queue.pop_blocking(Duration::from_millis(1));

            assert_eq!(queue.metrics().enqueued(), 5, "{:?}", backend);
            assert_eq!(queue.metrics().dequeued(), 2, "{:?}", backend);
            assert_eq!(queue.len(), 3);
            assert_eq!(queue.capacity(), 8);
        }
    }

    #[test]
    fn test_timed_push_without_metrics() {
        for backend in BACKENDS {
            let queue = backend.build::<u32>(1);
            queue.push_within(1, Duration::ZERO).unwrap();
            assert_eq!(queue.push_within(2, Duration::from_millis(10)), Err(2));

            assert_eq!(queue.metrics().block_events(), 0, "{:?}", backend);
            assert_eq!(queue.metrics().block_timeouts(), 0, "{:?}", backend);
            assert_eq!(queue.metrics().enqueued(), 1);
        }
    }

    #[test]
    fn test_concurrent_losses_report_distinct_counts() {
        for backend in BACKENDS {
            let queue: Arc<dyn BoundedQueue<u32>> = Arc::from(backend.build::<u32>(1));
            queue.push_or_discard(0).unwrap();

            let producers: Vec<_> = (0..4)
                .map(|_| {
                    let queue = Arc::clone(&queue);
                    thread::spawn(move || {
                        (0..500)
                            .map(|i| queue.push_or_discard(i).unwrap_err().discarded)
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut counts: Vec<u64> = producers
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect();
            counts.sort_unstable();
            assert_eq!(counts, (1..=2_000).collect::<Vec<_>>(), "{:?}", backend);
        }
    }
}
