//! Lock-based ring buffer queue

use super::{deadline_after, BoundedQueue, Rejected};
use crate::core::QueueMetrics;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Duration;

/// Fixed-capacity FIFO guarded by one mutex and two condition variables
///
/// `not_empty` wakes consumers after a push, `not_full` wakes blocked
/// producers after a pop.
pub struct RingQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: usize,
    not_empty: Condvar,
    not_full: Condvar,
    metrics: QueueMetrics,
}

impl<T> RingQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            metrics: QueueMetrics::new(),
        }
    }

    fn enqueued(&self) {
        self.metrics.record_enqueued();
        self.not_empty.notify_one();
    }

    fn dequeued(&self) {
        self.metrics.record_dequeued();
        self.not_full.notify_one();
    }
}

impl<T: Send> RingQueue<T> {
    /// Shared body of the timed pushes; `counted` selects whether block
    /// events and timeouts land in the metrics
    fn push_timed(&self, item: T, timeout: Duration, counted: bool) -> Result<(), T> {
        if self.capacity == 0 {
            if counted {
                self.metrics.record_block_timeout();
            }
            return Err(item);
        }

        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            if timeout.is_zero() {
                if counted {
                    self.metrics.record_block_timeout();
                }
                return Err(item);
            }
            if counted {
                self.metrics.record_block();
            }
            let deadline = deadline_after(timeout);
            while items.len() >= self.capacity {
                match deadline {
                    Some(deadline) => {
                        // Predicate is re-checked after a timeout too; a pop may
                        // have landed right at the deadline
                        if self.not_full.wait_until(&mut items, deadline).timed_out()
                            && items.len() >= self.capacity
                        {
                            if counted {
                                self.metrics.record_block_timeout();
                            }
                            return Err(item);
                        }
                    }
                    None => self.not_full.wait(&mut items),
                }
            }
        }
        items.push_back(item);
        drop(items);
        self.enqueued();
        Ok(())
    }
}

impl<T: Send> BoundedQueue<T> for RingQueue<T> {
    fn push_blocking(&self, item: T, timeout: Duration) -> Result<(), T> {
        self.push_timed(item, timeout, true)
    }

    fn push_within(&self, item: T, timeout: Duration) -> Result<(), T> {
        self.push_timed(item, timeout, false)
    }

    fn push_overwrite(&self, item: T) -> Option<u64> {
        if self.capacity == 0 {
            return Some(self.metrics.record_overrun() + 1);
        }

        let mut items = self.items.lock();
        let evicted = if items.len() >= self.capacity {
            let overruns = self.metrics.record_overrun() + 1;
            items.pop_front().map(|oldest| (oldest, overruns))
        } else {
            None
        };
        items.push_back(item);
        drop(items);
        self.enqueued();

        // Dropped outside the lock: an evicted job may release the last
        // reference to its logger
        evicted.map(|(_oldest, overruns)| overruns)
    }

    fn push_or_discard(&self, item: T) -> Result<(), Rejected<T>> {
        let mut items = self.items.lock();
        if items.len() >= self.capacity {
            drop(items);
            let discarded = self.metrics.record_discarded() + 1;
            return Err(Rejected { item, discarded });
        }
        items.push_back(item);
        drop(items);
        self.enqueued();
        Ok(())
    }

    fn pop_blocking(&self, timeout: Duration) -> Option<T> {
        let mut items = self.items.lock();
        let deadline = deadline_after(timeout);
        while items.is_empty() {
            match deadline {
                Some(deadline) => {
                    if self.not_empty.wait_until(&mut items, deadline).timed_out() {
                        break;
                    }
                }
                None => self.not_empty.wait(&mut items),
            }
        }
        let item = items.pop_front();
        drop(items);
        if item.is_some() {
            self.dequeued();
        }
        item
    }

    fn try_pop(&self) -> Option<T> {
        let item = self.items.lock().pop_front();
        if item.is_some() {
            self.dequeued();
        }
        item
    }

    fn len(&self) -> usize {
        self.items.lock().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }
}
