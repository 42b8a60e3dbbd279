//! Units of work passed from loggers to pool workers

use crate::core::Record;
use crate::logger::LoggerCore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One queued request
///
/// `Log` and `Flush` carry a [`JobTicket`], which keeps the issuing logger's
/// backend alive until the job is finished or discarded.
pub(crate) enum Job {
    Log { ticket: JobTicket, record: Record },
    Flush { ticket: JobTicket },
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TicketKind {
    Log,
    Flush,
}

/// Claim on a logger's pending-job counter
///
/// Minting a ticket increments the counter; dropping it decrements the
/// counter exactly once, whichever way the job ends: dispatched by a worker,
/// evicted by an overwrite push, rejected at enqueue time, or abandoned when
/// the pool's queue is torn down. A ticket dropped before
/// [`JobTicket::complete`] counts as a dropped message or a dropped flush.
pub(crate) struct JobTicket {
    core: Arc<LoggerCore>,
    kind: TicketKind,
    completed: bool,
    /// Set once the job has been handled, before the counter is released
    receipt: Option<Arc<AtomicBool>>,
}

impl JobTicket {
    pub(crate) fn issue(core: Arc<LoggerCore>, kind: TicketKind) -> Self {
        core.pending().increment();
        Self {
            core,
            kind,
            completed: false,
            receipt: None,
        }
    }

    /// Report completion through `receipt`, so a waiter can tell a job that
    /// ran from one that was dropped
    pub(crate) fn with_receipt(mut self, receipt: Arc<AtomicBool>) -> Self {
        self.receipt = Some(receipt);
        self
    }

    #[inline]
    pub(crate) fn core(&self) -> &LoggerCore {
        &self.core
    }

    /// Mark the job as handled by a worker and release the claim
    pub(crate) fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for JobTicket {
    fn drop(&mut self) {
        if self.completed {
            if let Some(receipt) = &self.receipt {
                receipt.store(true, Ordering::Release);
            }
        } else {
            match self.kind {
                TicketKind::Log => self.core.metrics().record_dropped(),
                TicketKind::Flush => self.core.metrics().record_flush_dropped(),
            };
        }

        if let Err(e) = self.core.pending().decrement(self.core.name()) {
            // The counter no longer matches the queue; flush waiters could
            // hang forever or return early. There is no safe way to continue.
            eprintln!("[LOGGER CRITICAL] {}. Aborting.", e);
            std::process::abort();
        }
    }
}

impl Job {
    pub(crate) fn log(ticket: JobTicket, record: Record) -> Self {
        Job::Log { ticket, record }
    }

    pub(crate) fn flush(ticket: JobTicket) -> Self {
        Job::Flush { ticket }
    }
}
