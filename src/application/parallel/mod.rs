//! Parallel Batch Compilation
//!
//! Runs many independent document builds at once:
//! - One worker thread per task, joined with `std::thread::scope`
//! - Admission bounded by a counting semaphore (`max_workers`, default 4)
//! - Per-task deadline derived from the caller's context (default 30s)
//! - Tasks that would write the same PDF are renamed or rejected before dispatch
//! - Outcomes aggregated in a [`ResultCollector`](crate::domain::services::ResultCollector)
//!
//! ## Usage
//!
//! ```ignore
//! let mut pool = WorkerPool::new(pipeline).with_event_sink(sink);
//! pool.configure_concurrency(2)?;
//! let result = pool.execute_parallel(&BuildContext::background(), &tasks)?;
//! ```

mod orchestrator;
mod outputs;
mod semaphore;

#[cfg(test)]
mod tests;

pub use orchestrator::{WorkerPool, DEFAULT_MAX_WORKERS, DEFAULT_TASK_TIMEOUT};
