//! Channel-backed queue built on `crossbeam_channel`

use super::{BoundedQueue, Rejected};
use crate::core::QueueMetrics;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::time::Duration;

/// Bounded queue over a crossbeam channel
///
/// The queue keeps both channel ends, so it can evict its own oldest item
/// through the receiver when an overwrite push finds the channel full.
/// The channel never disconnects while the queue is alive.
pub struct ChannelQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    capacity: usize,
    metrics: QueueMetrics,
}

impl<T> ChannelQueue<T> {
    pub fn new(capacity: usize) -> Self {
        // A zero-capacity crossbeam channel is a rendezvous channel. Such a
        // queue must reject every push instead, so the channel itself is
        // given one slot and never used for capacity 0.
        let (sender, receiver) = bounded(capacity.max(1));
        Self {
            sender,
            receiver,
            capacity,
            metrics: QueueMetrics::new(),
        }
    }

    fn popped(&self, item: Option<T>) -> Option<T> {
        if item.is_some() {
            self.metrics.record_dequeued();
        }
        item
    }
}

impl<T: Send> ChannelQueue<T> {
    /// Shared body of the timed pushes; `counted` selects whether block
    /// events and timeouts land in the metrics
    fn push_timed(&self, item: T, timeout: Duration, counted: bool) -> Result<(), T> {
        if self.capacity == 0 {
            if counted {
                self.metrics.record_block_timeout();
            }
            return Err(item);
        }

        let item = match self.sender.try_send(item) {
            Ok(()) => {
                self.metrics.record_enqueued();
                return Ok(());
            }
            Err(err) => err.into_inner(),
        };
        if timeout.is_zero() {
            if counted {
                self.metrics.record_block_timeout();
            }
            return Err(item);
        }

        if counted {
            self.metrics.record_block();
        }
        match self.sender.send_timeout(item, timeout) {
            Ok(()) => {
                self.metrics.record_enqueued();
                Ok(())
            }
            Err(err) => {
                if counted {
                    self.metrics.record_block_timeout();
                }
                Err(err.into_inner())
            }
        }
    }
}

impl<T: Send> BoundedQueue<T> for ChannelQueue<T> {
    fn push_blocking(&self, item: T, timeout: Duration) -> Result<(), T> {
        self.push_timed(item, timeout, true)
    }

    fn push_within(&self, item: T, timeout: Duration) -> Result<(), T> {
        self.push_timed(item, timeout, false)
    }

    fn push_overwrite(&self, mut item: T) -> Option<u64> {
        if self.capacity == 0 {
            return Some(self.metrics.record_overrun() + 1);
        }

        let mut overruns = None;
        loop {
            match self.sender.try_send(item) {
                Ok(()) => {
                    self.metrics.record_enqueued();
                    return overruns;
                }
                Err(TrySendError::Full(rejected)) => {
                    item = rejected;
                    // A concurrent consumer may have emptied the slot first, in
                    // which case nothing was evicted and the send is retried
                    if self.receiver.try_recv().is_ok() {
                        self.metrics.record_dequeued();
                        overruns = Some(self.metrics.record_overrun() + 1);
                    }
                }
                Err(TrySendError::Disconnected(rejected)) => {
                    // Unreachable while self holds the receiver
                    drop(rejected);
                    return Some(self.metrics.record_overrun() + 1);
                }
            }
        }
    }

    fn push_or_discard(&self, item: T) -> Result<(), Rejected<T>> {
        if self.capacity == 0 {
            let discarded = self.metrics.record_discarded() + 1;
            return Err(Rejected { item, discarded });
        }

        match self.sender.try_send(item) {
            Ok(()) => {
                self.metrics.record_enqueued();
                Ok(())
            }
            Err(err) => {
                let discarded = self.metrics.record_discarded() + 1;
                Err(Rejected {
                    item: err.into_inner(),
                    discarded,
                })
            }
        }
    }

    fn pop_blocking(&self, timeout: Duration) -> Option<T> {
        let item = self.receiver.recv_timeout(timeout).ok();
        self.popped(item)
    }

    fn try_pop(&self) -> Option<T> {
        let item = self.receiver.try_recv().ok();
        self.popped(item)
    }

    fn len(&self) -> usize {
        if self.capacity == 0 {
            0
        } else {
            self.receiver.len()
        }
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }
}
