//! Worker Pool Orchestrator implementation

use std::cmp::Reverse;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::{
    BuildFailure, BuildResult, CompilationTask, ParallelCompilationResult,
};
use crate::domain::ports::{
    BuildEvent, BuildEventSink, BuildPipeline, BuildRequest, NoopBuildEventSink,
};
use crate::domain::services::ResultCollector;
use crate::domain::value_objects::{format_duration, BuildContext};
use crate::error::{BuildError, TexforgeError, TexforgeResult};

use super::outputs::plan_requests;
use super::semaphore::Semaphore;

/// Pool width used when nothing is configured
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Per-task timeout used when nothing is configured
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded-concurrency batch compiler
///
/// Each task gets its own worker thread, but only `max_workers` of them are
/// admitted into the pipeline at a time. Tasks are admitted in descending
/// priority; equal priorities keep submission order.
pub struct WorkerPool {
    pipeline: Arc<dyn BuildPipeline>,
    events: Arc<dyn BuildEventSink>,
    max_workers: usize,
    timeout: Duration,
    collector: ResultCollector,
    batch: Mutex<()>,
}

impl WorkerPool {
    pub fn new(pipeline: Arc<dyn BuildPipeline>) -> Self {
        Self {
            pipeline,
            events: Arc::new(NoopBuildEventSink),
            max_workers: DEFAULT_MAX_WORKERS,
            timeout: DEFAULT_TASK_TIMEOUT,
            collector: ResultCollector::new(),
            batch: Mutex::new(()),
        }
    }

    /// Set the observer that receives batch progress
    pub fn with_event_sink(mut self, events: Arc<dyn BuildEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Set the pool width for subsequent batches
    pub fn configure_concurrency(&mut self, max_workers: usize) -> TexforgeResult<()> {
        if max_workers == 0 {
            return Err(TexforgeError::InvalidArgument(
                "max workers must be greater than zero".to_string(),
            ));
        }
        self.max_workers = max_workers;
        Ok(())
    }

    /// Set the default per-task timeout for subsequent batches
    pub fn configure_timeout(&mut self, timeout: Duration) -> TexforgeResult<()> {
        if timeout.is_zero() {
            return Err(TexforgeError::InvalidArgument(
                "task timeout must be greater than zero".to_string(),
            ));
        }
        self.timeout = timeout;
        Ok(())
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Collector for the current (or last) batch, for polling progress from
    /// another thread via `total_count` / `is_complete`.
    pub fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    /// Run every task and return once all of them have an outcome.
    ///
    /// Individual failures, timeouts, and cancellations are recorded as
    /// [`BuildFailure`]s; they never abort sibling tasks or this call.
    /// Concurrent calls on the same pool run one batch after the other.
    pub fn execute_parallel(
        &self,
        ctx: &BuildContext,
        tasks: &[CompilationTask],
    ) -> TexforgeResult<ParallelCompilationResult> {
        if self.max_workers == 0 || self.timeout.is_zero() {
            return Err(TexforgeError::InvalidArgument(
                "worker pool is not configured".to_string(),
            ));
        }

        let _batch = self.batch.lock().unwrap_or_else(PoisonError::into_inner);
        self.collector.reset();

        let mut ordered: Vec<&CompilationTask> = tasks.iter().collect();
        ordered.sort_by_key(|task| Reverse(task.priority()));

        info!(
            tasks = tasks.len(),
            max_workers = self.max_workers,
            timeout = %format_duration(self.timeout),
            "starting batch"
        );
        self.events.on_event(BuildEvent::BatchStarted {
            tasks: tasks.len(),
            max_workers: self.max_workers,
        });

        let plans = plan_requests(self.pipeline.as_ref(), &ordered);

        let semaphore = Semaphore::new(self.max_workers);
        thread::scope(|scope| {
            for (index, (task, plan)) in ordered.into_iter().zip(plans).enumerate() {
                let request = match plan {
                    Ok(request) => request,
                    Err(err) => {
                        self.record(task, Err(err), Duration::ZERO);
                        continue;
                    }
                };

                let permit = semaphore.acquire();
                let spawned = thread::Builder::new()
                    .name(format!("texforge-worker-{index}"))
                    .spawn_scoped(scope, move || {
                        let _permit = permit;
                        self.run_task(ctx, task, &request);
                    });

                if let Err(e) = spawned {
                    warn!(template = %task.template_file().display(), error = %e, "failed to spawn worker");
                    self.record(
                        task,
                        Err(BuildError::Other(format!("failed to spawn worker: {e}"))),
                        Duration::ZERO,
                    );
                }
            }
        });

        let results = self.collector.results();
        info!(
            succeeded = results.success_count,
            failed = results.failure_count,
            elapsed_ms = results.total_duration.as_millis() as u64,
            "batch finished"
        );
        self.events.on_event(BuildEvent::BatchCompleted {
            succeeded: results.success_count,
            failed: results.failure_count,
            duration_ms: results.total_duration.as_millis() as u64,
        });

        Ok(results)
    }

    fn run_task(&self, parent: &BuildContext, task: &CompilationTask, request: &BuildRequest) {
        let started = Instant::now();

        if let Some(err) = parent.err() {
            debug!(template = %task.template_file().display(), "skipping task: {err}");
            self.record(task, Err(err), started.elapsed());
            return;
        }

        let ctx = parent.with_timeout(task.timeout().unwrap_or(self.timeout));
        debug!(
            template = %task.template_file().display(),
            priority = task.priority(),
            "task admitted"
        );
        self.events.on_event(BuildEvent::TaskStarted {
            template: task.template_file().display().to_string(),
        });

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pipeline.build(&ctx, request)
        }))
        .unwrap_or_else(|_| Err(BuildError::Other("build pipeline panicked".to_string())));

        // A pipeline that ignores its context still loses the race with the deadline.
        let outcome = match (outcome, ctx.err()) {
            (Ok(_), Some(err @ BuildError::Timeout { .. })) => Err(err),
            (outcome, _) => outcome.map(|output| output.pdf_path),
        };

        self.record(task, outcome, started.elapsed());
    }

    fn record(
        &self,
        task: &CompilationTask,
        outcome: Result<std::path::PathBuf, BuildError>,
        duration: Duration,
    ) {
        let template = task.template_file().to_path_buf();
        let duration_ms = duration.as_millis() as u64;

        match outcome {
            Ok(pdf_path) => {
                debug!(template = %template.display(), pdf = %pdf_path.display(), duration_ms, "task succeeded");
                self.events.on_event(BuildEvent::TaskSucceeded {
                    template: template.display().to_string(),
                    pdf: pdf_path.display().to_string(),
                    duration_ms,
                });
                self.collector.add_success(BuildResult {
                    template_file: template,
                    pdf_path,
                    duration,
                    timestamp: Utc::now(),
                });
            }
            Err(error) => {
                warn!(template = %template.display(), duration_ms, "task failed: {error}");
                self.events.on_event(BuildEvent::TaskFailed {
                    template: template.display().to_string(),
                    error: error.to_string(),
                    duration_ms,
                });
                self.collector.add_failure(BuildFailure {
                    template_file: template,
                    error,
                    duration,
                    timestamp: Utc::now(),
                });
            }
        }
    }
}
