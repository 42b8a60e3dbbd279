//! Pending-job accounting and flush waiting

use crate::core::{LoggerError, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Number of a logger's jobs that are queued or being processed
///
/// Incremented once per accepted job, decremented once when the job is
/// finished (or evicted). Dropping to zero wakes every waiter.
#[derive(Debug, Default)]
pub struct PendingCounter {
    count: AtomicUsize,
    lock: Mutex<()>,
    drained: Condvar,
}

impl PendingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    #[inline]
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Decrement, returning the remaining count
    ///
    /// `logger` only labels the error. Decrementing from zero means a job was
    /// finished twice or never registered.
    pub fn decrement(&self, logger: &str) -> Result<usize> {
        let previous = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| LoggerError::counter_underflow(logger))?;
        if previous == 1 {
            // Notify under the lock so a waiter between its check and its
            // wait cannot miss the wake-up
            let _guard = self.lock.lock();
            self.drained.notify_all();
        }
        Ok(previous - 1)
    }

    /// Block until the count reaches zero
    pub fn wait(&self) {
        if self.get() == 0 {
            return;
        }
        let mut guard = self.lock.lock();
        while self.get() > 0 {
            self.drained.wait(&mut guard);
        }
    }

    /// Block until the count reaches zero or `timeout` elapses; returns
    /// whether the count reached zero
    pub fn wait_for(&self, timeout: Duration) -> bool {
        if self.get() == 0 {
            return true;
        }
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut guard = self.lock.lock();
        while self.get() > 0 {
            if self.drained.wait_until(&mut guard, deadline).timed_out() {
                return self.get() == 0;
            }
        }
        true
    }
}
