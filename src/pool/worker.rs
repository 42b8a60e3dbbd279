//! Worker thread loop

use super::job::Job;
use super::PoolShared;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Body of every pool thread
///
/// Runs until a `Terminate` job is popped, or until the pool's stop flag is
/// set and a poll comes back empty.
pub(super) fn run(shared: Arc<PoolShared>) {
    if let Some(hook) = &shared.on_thread_start {
        run_hook(hook.as_ref(), "start");
    }

    loop {
        match shared.queue.pop_blocking(shared.poll_interval) {
            Some(Job::Terminate) => break,
            Some(job) => process(job),
            None if shared.is_stopping() => break,
            None => {}
        }
    }

    if let Some(hook) = &shared.on_thread_stop {
        run_hook(hook.as_ref(), "stop");
    }
}

/// Dispatch one job to its logger's backend
///
/// Also used for the inline drain after workers have exited. Sink and
/// formatter failures are handled inside the backend calls, so this never
/// unwinds out of a worker.
pub(super) fn process(job: Job) {
    match job {
        Job::Log { ticket, record } => {
            ticket.core().backend_log(&record);
            ticket.complete();
        }
        Job::Flush { ticket } => {
            ticket.core().backend_flush();
            ticket.complete();
        }
        Job::Terminate => {}
    }
}

fn run_hook(hook: &(dyn Fn() + Send + Sync), stage: &str) {
    if let Err(panic_info) = catch_unwind(AssertUnwindSafe(hook)) {
        eprintln!(
            "[LOGGER ERROR] Worker thread {} hook panicked: {}",
            stage,
            crate::core::panic_message(panic_info.as_ref())
        );
    }
}
