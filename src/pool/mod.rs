//! Worker pool shared by async loggers
//!
//! A [`ThreadPool`] owns one bounded job queue and a fixed set of worker
//! threads. Loggers never own the pool: they hold a [`PoolHandle`], a weak
//! observer that stops resolving once the pool has shut down.
//!
//! # Example
//!
//! ```
//! use async_log_engine::{ThreadPool, ThreadPoolConfig};
//!
//! let pool = ThreadPool::new(ThreadPoolConfig::new(2).with_queue_capacity(128))?;
//! let handle = pool.handle();
//! assert!(handle.is_alive());
//!
//! assert!(pool.shutdown());
//! assert!(!handle.is_alive());
//! # Ok::<(), async_log_engine::LoggerError>(())
//! ```

mod config;
pub(crate) mod job;
mod worker;

pub use config::{
    ThreadHook, ThreadPoolConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT, MAX_WORKERS,
};

use crate::core::{LoggerError, OverflowPolicy, QueueMetrics, Result};
use crate::queue::BoundedQueue;
use job::Job;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// State shared by the pool owner, its workers and (weakly) every logger
pub(crate) struct PoolShared {
    queue: Box<dyn BoundedQueue<Job>>,
    /// Cleared first during shutdown; loggers then get `PoolGone`
    accepting: AtomicBool,
    /// Idle workers exit once this is set
    stop: AtomicBool,
    poll_interval: Duration,
    worker_count: usize,
    on_thread_start: Option<ThreadHook>,
    on_thread_stop: Option<ThreadHook>,
}

/// Result of handing a job to the pool under an overflow policy
///
/// A job that was not accepted has already been dropped, which released its
/// ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Enqueued {
    /// In the queue; `waited` if the producer found it full first
    Accepted { waited: bool },
    /// In the queue, an older job was evicted for it; carries the queue's
    /// overrun count including that eviction
    Overran { overruns: u64 },
    /// Rejected because the queue was full; carries the queue's discard
    /// count including this rejection
    Discarded { discarded: u64 },
    /// Block policy gave up at its deadline
    TimedOut,
    /// The pool stopped accepting jobs
    Closed,
}

impl PoolShared {
    #[inline]
    pub(crate) fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    #[inline]
    fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub(crate) fn enqueue(
        &self,
        job: Job,
        policy: OverflowPolicy,
        block_timeout: Option<Duration>,
    ) -> Enqueued {
        if !self.is_accepting() {
            return Enqueued::Closed;
        }
        match policy {
            OverflowPolicy::Block => self.enqueue_blocking(job, block_timeout),
            OverflowPolicy::OverrunOldest => match self.queue.push_overwrite(job) {
                Some(overruns) => Enqueued::Overran { overruns },
                None => Enqueued::Accepted { waited: false },
            },
            OverflowPolicy::DiscardNew => match self.queue.push_or_discard(job) {
                Ok(()) => Enqueued::Accepted { waited: false },
                Err(rejected) => Enqueued::Discarded {
                    discarded: rejected.discarded,
                },
            },
        }
    }

    /// Wait for space in poll-interval slices so a producer blocked on a
    /// full queue notices shutdown instead of waiting on workers that are
    /// gone
    ///
    /// The slices are one wait as far as the queue metrics go: one block
    /// event when the queue is first found full, one timeout if the
    /// deadline passes.
    fn enqueue_blocking(&self, job: Job, timeout: Option<Duration>) -> Enqueued {
        let metrics = self.queue.metrics();

        // Nothing can ever free a slot in a zero-capacity queue
        if self.queue.capacity() == 0 {
            metrics.record_block_timeout();
            return Enqueued::TimedOut;
        }

        let mut job = match self.queue.push_within(job, Duration::ZERO) {
            Ok(()) => return Enqueued::Accepted { waited: false },
            Err(rejected) => rejected,
        };
        metrics.record_block();

        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        loop {
            if !self.is_accepting() {
                return Enqueued::Closed;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        metrics.record_block_timeout();
                        return Enqueued::TimedOut;
                    }
                    left.min(self.poll_interval)
                }
                None => self.poll_interval,
            };
            match self.queue.push_within(job, slice) {
                Ok(()) => return Enqueued::Accepted { waited: true },
                Err(rejected) => job = rejected,
            }
        }
    }

    /// Dispatch whatever is still queued on the calling thread
    fn drain_inline(&self) -> usize {
        let mut drained = 0;
        while let Some(job) = self.queue.try_pop() {
            if !matches!(job, Job::Terminate) {
                drained += 1;
            }
            worker::process(job);
        }
        drained
    }
}

impl Drop for PoolShared {
    fn drop(&mut self) {
        // A producer that passed the accepting check just before shutdown
        // can still land a job after the final drain; it is delivered by
        // whoever releases the last reference
        let late = self.drain_inline();
        if late > 0 {
            eprintln!(
                "[LOGGER WARNING] {} job(s) reached the queue after pool shutdown and were processed inline",
                late
            );
        }
    }
}

/// Fixed-size pool of worker threads draining one bounded queue
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
    shutdown_timeout: Duration,
    shut_down: bool,
}

impl ThreadPool {
    /// Validate `config`, build the queue and spawn the workers
    pub fn new(config: ThreadPoolConfig) -> Result<Self> {
        config.validate()?;

        let shared = Arc::new(PoolShared {
            queue: config.backend.build(config.queue_capacity),
            accepting: AtomicBool::new(true),
            stop: AtomicBool::new(false),
            poll_interval: config.poll_interval,
            worker_count: config.worker_count,
            on_thread_start: config.on_thread_start.clone(),
            on_thread_stop: config.on_thread_stop.clone(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(config.worker_count),
            shutdown_timeout: config.shutdown_timeout,
            shut_down: false,
        };

        for index in 0..config.worker_count {
            let shared = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, index))
                .spawn(move || worker::run(shared));
            match spawned {
                Ok(handle) => pool.workers.push(handle),
                // Dropping the partial pool stops the workers already running
                Err(e) => return Err(LoggerError::ThreadSpawn(e)),
            }
        }

        Ok(pool)
    }

    /// Pool with default settings apart from capacity and worker count
    pub fn with_capacity(queue_capacity: usize, worker_count: usize) -> Result<Self> {
        Self::new(ThreadPoolConfig::new(worker_count).with_queue_capacity(queue_capacity))
    }

    /// Weak handle for loggers
    pub fn handle(&self) -> PoolHandle {
        PoolHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.shared.worker_count
    }

    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    /// Jobs evicted by overwrite-oldest pushes
    pub fn overrun_count(&self) -> u64 {
        self.shared.queue.overrun_count()
    }

    /// Jobs rejected by discard-new pushes
    pub fn discard_count(&self) -> u64 {
        self.shared.queue.discard_count()
    }

    pub fn reset_overrun_count(&self) {
        self.shared.queue.reset_overrun_count();
    }

    pub fn reset_discard_count(&self) {
        self.shared.queue.reset_discard_count();
    }

    pub fn queue_metrics(&self) -> &QueueMetrics {
        self.shared.queue.metrics()
    }

    /// Stop the workers after they drain the queue
    ///
    /// Returns `true` if every worker exited within the shutdown timeout and
    /// none panicked.
    pub fn shutdown(mut self) -> bool {
        self.shutdown_inner()
    }

    fn shutdown_inner(&mut self) -> bool {
        if self.shut_down {
            return true;
        }
        self.shut_down = true;

        self.shared.accepting.store(false, Ordering::Release);
        self.shared.stop.store(true, Ordering::Release);

        let start = Instant::now();
        let remaining = |start: Instant| self.shutdown_timeout.saturating_sub(start.elapsed());

        // Terminate jobs queue behind everything already accepted. If the
        // queue stays full (or has no capacity) the stop flag still lets
        // workers leave once it empties.
        for _ in 0..self.workers.len() {
            if self
                .shared
                .queue
                .push_within(Job::Terminate, remaining(start))
                .is_err()
            {
                break;
            }
        }

        let mut clean = true;
        for handle in self.workers.drain(..) {
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Log worker thread panicked during shutdown: {:?}", e);
                        clean = false;
                    }
                    break;
                }

                if start.elapsed() >= self.shutdown_timeout {
                    eprintln!(
                        "[LOGGER WARNING] Log worker thread did not finish within {:?} timeout. \
                         Queued logs may be lost.",
                        self.shutdown_timeout
                    );
                    clean = false;
                    break;
                }

                thread::sleep(Duration::from_millis(1));
            }
        }

        // Stuck workers still hold the queue; only drain when nobody else can
        if clean {
            self.shared.drain_inline();
        }
        clean
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("worker_count", &self.shared.worker_count)
            .field("queue_len", &self.queue_len())
            .field("queue_capacity", &self.queue_capacity())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

/// Non-owning reference to a [`ThreadPool`]
///
/// Cloning is cheap. Once the pool starts shutting down every accessor
/// returns `None` and loggers bound to it report `PoolGone`.
#[derive(Clone, Default)]
pub struct PoolHandle {
    shared: Weak<PoolShared>,
}

impl PoolHandle {
    /// Handle that never resolves to a pool
    pub fn detached() -> Self {
        Self::default()
    }

    pub(crate) fn upgrade(&self) -> Option<Arc<PoolShared>> {
        self.shared.upgrade().filter(|shared| shared.is_accepting())
    }

    /// Whether the pool still exists and accepts jobs
    pub fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }

    pub fn worker_count(&self) -> Option<usize> {
        self.upgrade().map(|shared| shared.worker_count)
    }

    pub fn queue_len(&self) -> Option<usize> {
        self.upgrade().map(|shared| shared.queue.len())
    }

    pub fn queue_capacity(&self) -> Option<usize> {
        self.upgrade().map(|shared| shared.queue.capacity())
    }

    pub fn overrun_count(&self) -> Option<u64> {
        self.upgrade().map(|shared| shared.queue.overrun_count())
    }

    pub fn discard_count(&self) -> Option<u64> {
        self.upgrade().map(|shared| shared.queue.discard_count())
    }

    /// Whether both handles observe the same pool
    pub fn same_pool(&self, other: &PoolHandle) -> bool {
        Weak::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for PoolHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
