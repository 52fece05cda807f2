//! Fork/join worker pool
//!
//! The engine needs a capability, not a specific executor: run a
//! divide-and-conquer task graph with work-stealing load balancing and
//! block the caller until it completes, surfacing any fault from a forked
//! task. This wraps a dedicated [`rayon::ThreadPool`]; one instance is
//! shared by both the reduction and scan passes of an engine.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::ScanError;

/// Work-stealing pool the engine submits its passes to
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool with `workers` threads, or sized to available
    /// hardware concurrency when `None`.
    pub fn new(workers: Option<usize>) -> Result<Self, ScanError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|idx| format!("heatscan-worker-{idx}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task` to completion inside the pool. `task` may fork further
    /// via [`rayon::join`]; those subtasks stay on this pool.
    ///
    /// A panic anywhere in the task graph propagates through the join
    /// points and is converted into [`ScanError::TaskFailure`] here, so
    /// callers never observe partial results.
    pub fn invoke<F, R>(&self, task: F) -> Result<R, ScanError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        panic::catch_unwind(AssertUnwindSafe(|| self.pool.install(task)))
            .map_err(|payload| ScanError::TaskFailure(panic_message(&payload)))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}
