//! Thread-safe sink for worker outcomes
//!
//! Workers append under an exclusive lock; readers only ever receive value
//! snapshots, never a view into storage that may still be growing.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::domain::entities::{BuildFailure, BuildResult, ParallelCompilationResult};

#[derive(Debug)]
struct Outcomes {
    successes: Vec<BuildResult>,
    failures: Vec<BuildFailure>,
    started: Instant,
}

impl Outcomes {
    fn fresh() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
            started: Instant::now(),
        }
    }
}

/// Accumulates successes and failures for one batch
#[derive(Debug)]
pub struct ResultCollector {
    outcomes: RwLock<Outcomes>,
}

impl Default for ResultCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCollector {
    pub fn new() -> Self {
        Self {
            outcomes: RwLock::new(Outcomes::fresh()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Outcomes> {
        self.outcomes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Outcomes> {
        self.outcomes.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_success(&self, result: BuildResult) {
        self.write().successes.push(result);
    }

    pub fn add_failure(&self, failure: BuildFailure) {
        self.write().failures.push(failure);
    }

    /// Value snapshot of everything recorded so far.
    ///
    /// `total_duration` is measured from construction or the last [`reset`](Self::reset).
    pub fn results(&self) -> ParallelCompilationResult {
        let outcomes = self.read();
        ParallelCompilationResult {
            successful_builds: outcomes.successes.clone(),
            failed_builds: outcomes.failures.clone(),
            total_duration: outcomes.started.elapsed(),
            success_count: outcomes.successes.len(),
            failure_count: outcomes.failures.len(),
        }
    }

    /// Clear all outcomes and restart the clock.
    ///
    /// Only call once every worker feeding this collector has been joined.
    pub fn reset(&self) {
        *self.write() = Outcomes::fresh();
    }

    pub fn success_count(&self) -> usize {
        self.read().successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.read().failures.len()
    }

    pub fn total_count(&self) -> usize {
        let outcomes = self.read();
        outcomes.successes.len() + outcomes.failures.len()
    }

    /// True once at least `expected` outcomes have been recorded
    pub fn is_complete(&self, expected: usize) -> bool {
        self.total_count() >= expected
    }
}
