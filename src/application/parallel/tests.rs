//! Tests for the parallel module

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::orchestrator::WorkerPool;
use crate::domain::entities::CompilationTask;
use crate::domain::ports::{BuildEvent, BuildOutput, BuildPipeline, BuildRequest, RebuildResult};
use crate::domain::value_objects::{BuildContext, CancellationToken};
use crate::error::BuildError;

/// Pipeline stub that records call order and peak concurrency
#[derive(Default)]
struct StubPipeline {
    delay: Duration,
    fail_on: Vec<String>,
    /// Report every PDF under one shared directory
    flat_outputs: bool,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<PathBuf>>,
}

impl StubPipeline {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn failing_on(mut self, template: &str) -> Self {
        self.fail_on.push(template.to_string());
        self
    }

    fn with_flat_outputs() -> Self {
        Self {
            flat_outputs: true,
            ..Self::default()
        }
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildPipeline for StubPipeline {
    fn build(&self, _ctx: &BuildContext, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push(request.template_file.clone());

        std::thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);

        let name = request.template_file.display().to_string();
        if self.fail_on.contains(&name) {
            return Err(BuildError::CommandFailed {
                program: "pdflatex".to_string(),
                status: "exit status 1".to_string(),
                detail: format!("! LaTeX Error in {name}"),
            });
        }
        Ok(BuildOutput {
            pdf_path: self
                .output_path(request)
                .unwrap_or_else(|| request.template_file.with_extension("pdf")),
            images: Vec::new(),
        })
    }

    fn output_path(&self, request: &BuildRequest) -> Option<PathBuf> {
        if !self.flat_outputs {
            return None;
        }
        Some(PathBuf::from("out").join(format!("{}.pdf", request.document_name()?)))
    }

    fn rebuild(
        &self,
        _ctx: &BuildContext,
        template_file: &Path,
        _config_file: &Path,
    ) -> Result<RebuildResult, BuildError> {
        Ok(RebuildResult::succeeded(template_file.with_extension("pdf")))
    }
}

/// Pipeline stub that panics on every call
struct PanickingPipeline;

impl BuildPipeline for PanickingPipeline {
    fn build(&self, _ctx: &BuildContext, _request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        panic!("engine exploded");
    }

    fn rebuild(
        &self,
        _ctx: &BuildContext,
        _template_file: &Path,
        _config_file: &Path,
    ) -> Result<RebuildResult, BuildError> {
        unreachable!()
    }
}

fn tasks(names: &[&str]) -> Vec<CompilationTask> {
    names
        .iter()
        .map(|n| CompilationTask::new(*n, PathBuf::from(*n).with_extension("yaml")))
        .collect()
}

fn pool_with(pipeline: Arc<StubPipeline>, workers: usize) -> WorkerPool {
    let mut pool = WorkerPool::new(pipeline);
    pool.configure_concurrency(workers).unwrap();
    pool
}

// === Configuration ===

#[test]
fn configure_rejects_zero_concurrency_and_timeout() {
    let mut pool = WorkerPool::new(Arc::new(StubPipeline::default()));

    assert!(pool.configure_concurrency(0).is_err());
    assert!(pool.configure_timeout(Duration::ZERO).is_err());

    // Rejected values leave the previous configuration intact
    assert_eq!(pool.max_workers(), super::DEFAULT_MAX_WORKERS);
    assert_eq!(pool.timeout(), super::DEFAULT_TASK_TIMEOUT);

    pool.configure_concurrency(8).unwrap();
    pool.configure_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(pool.max_workers(), 8);
    assert_eq!(pool.timeout(), Duration::from_secs(5));
}

#[test]
fn huge_timeout_runs_batch_without_deadline() {
    let pipeline = Arc::new(StubPipeline::default());
    let mut pool = pool_with(pipeline, 2);
    pool.configure_timeout(Duration::MAX).unwrap();

    let result = pool
        .execute_parallel(&BuildContext::background(), &tasks(&["a.tex", "b.tex"]))
        .unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 0);
}

// === Batch scenarios ===

#[test]
fn colliding_outputs_are_renamed_or_rejected() {
    let pipeline = Arc::new(StubPipeline::with_flat_outputs());
    let pool = pool_with(pipeline.clone(), 2);
    let tasks = vec![
        CompilationTask::new("letter.tex", "alice.yaml"),
        CompilationTask::new("letter.tex", "bob.yaml"),
        CompilationTask::new("letter.tex", "again/bob.yaml"),
    ];

    let result = pool
        .execute_parallel(&BuildContext::background(), &tasks)
        .unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 1);
    let pdfs: BTreeSet<PathBuf> = result
        .successful_builds
        .iter()
        .map(|b| b.pdf_path.clone())
        .collect();
    assert_eq!(
        pdfs,
        BTreeSet::from([
            PathBuf::from("out/letter-alice.pdf"),
            PathBuf::from("out/letter-bob.pdf"),
        ])
    );
    assert!(matches!(
        result.failed_builds[0].error,
        BuildError::OutputConflict { .. }
    ));
    // The rejected task never reached the pipeline
    assert_eq!(pipeline.calls().len(), 2);
}

#[test]
fn three_tasks_two_workers_all_succeed() {
    let pipeline = Arc::new(StubPipeline::with_delay(Duration::from_millis(10)));
    let pool = pool_with(pipeline.clone(), 2);

    let result = pool
        .execute_parallel(&BuildContext::background(), &tasks(&["a.tex", "b.tex", "c.tex"]))
        .unwrap();

    assert_eq!(result.success_count, 3);
    assert_eq!(result.failure_count, 0);
    assert_eq!(result.successful_builds.len(), 3);
    assert!(result.total_duration > Duration::ZERO);
    assert!(result.is_success());
}

#[test]
fn every_task_is_accounted_for() {
    let pipeline = Arc::new(
        StubPipeline::with_delay(Duration::from_millis(2))
            .failing_on("t3.tex")
            .failing_on("t7.tex"),
    );
    let pool = pool_with(pipeline, 3);
    let names: Vec<String> = (0..10).map(|i| format!("t{i}.tex")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let input = tasks(&refs);

    let result = pool
        .execute_parallel(&BuildContext::background(), &input)
        .unwrap();

    assert_eq!(result.success_count + result.failure_count, input.len());
    let expected: BTreeSet<PathBuf> = input.iter().map(|t| t.template_file().to_path_buf()).collect();
    assert_eq!(result.templates(), expected);
}

#[test]
fn failing_task_does_not_affect_siblings() {
    let pipeline = Arc::new(StubPipeline::default().failing_on("bad.tex"));
    let pool = pool_with(pipeline, 2);

    let result = pool
        .execute_parallel(
            &BuildContext::background(),
            &tasks(&["good1.tex", "bad.tex", "good2.tex"]),
        )
        .unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 1);
    let failure = &result.failed_builds[0];
    assert_eq!(failure.template_file, PathBuf::from("bad.tex"));
    assert!(matches!(failure.error, BuildError::CommandFailed { .. }));
}

#[test]
fn concurrency_never_exceeds_max_workers() {
    for workers in [1, 2, 4] {
        let pipeline = Arc::new(StubPipeline::with_delay(Duration::from_millis(15)));
        let pool = pool_with(pipeline.clone(), workers);
        let names: Vec<String> = (0..12).map(|i| format!("doc{i}.tex")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        pool.execute_parallel(&BuildContext::background(), &tasks(&refs))
            .unwrap();

        assert!(
            pipeline.peak() <= workers,
            "peak {} exceeded {} workers",
            pipeline.peak(),
            workers
        );
    }
}

#[test]
fn higher_priority_is_admitted_first() {
    let pipeline = Arc::new(StubPipeline::default());
    let pool = pool_with(pipeline.clone(), 1);
    let batch = vec![
        CompilationTask::new("low.tex", "low.yaml").with_priority(-1),
        CompilationTask::new("first-normal.tex", "n.yaml"),
        CompilationTask::new("urgent.tex", "u.yaml").with_priority(10),
        CompilationTask::new("second-normal.tex", "n.yaml"),
    ];

    pool.execute_parallel(&BuildContext::background(), &batch)
        .unwrap();

    assert_eq!(
        pipeline.calls(),
        vec![
            PathBuf::from("urgent.tex"),
            PathBuf::from("first-normal.tex"),
            PathBuf::from("second-normal.tex"),
            PathBuf::from("low.tex"),
        ]
    );
}

// === Timeouts, cancellation, panics ===

#[test]
fn task_past_its_deadline_is_a_timeout_failure() {
    let pipeline = Arc::new(StubPipeline::with_delay(Duration::from_millis(60)));
    let pool = pool_with(pipeline, 2);
    let batch = vec![
        CompilationTask::new("slow.tex", "slow.yaml").with_timeout(Duration::from_millis(5)),
        CompilationTask::new("fine.tex", "fine.yaml"),
    ];

    let result = pool
        .execute_parallel(&BuildContext::background(), &batch)
        .unwrap();

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failure_count, 1);
    assert_eq!(
        result.failed_builds[0].error,
        BuildError::Timeout {
            after: Duration::from_millis(5)
        }
    );
}

#[test]
fn cancelled_context_records_every_task_without_building() {
    let pipeline = Arc::new(StubPipeline::default());
    let pool = pool_with(pipeline.clone(), 2);
    let token = CancellationToken::new();
    token.cancel();

    let result = pool
        .execute_parallel(
            &BuildContext::with_token(token),
            &tasks(&["a.tex", "b.tex", "c.tex"]),
        )
        .unwrap();

    assert_eq!(result.failure_count, 3);
    assert!(result
        .failed_builds
        .iter()
        .all(|f| f.error == BuildError::Cancelled));
    assert!(pipeline.calls().is_empty());
}

#[test]
fn panicking_pipeline_is_recorded_as_failure() {
    let pool = WorkerPool::new(Arc::new(PanickingPipeline));

    let result = pool
        .execute_parallel(&BuildContext::background(), &tasks(&["a.tex", "b.tex"]))
        .unwrap();

    assert_eq!(result.failure_count, 2);
    assert_eq!(result.success_count, 0);
}

#[test]
fn empty_batch_returns_empty_result() {
    let pool = WorkerPool::new(Arc::new(StubPipeline::default()));

    let result = pool
        .execute_parallel(&BuildContext::background(), &[])
        .unwrap();

    assert_eq!(result.total_count(), 0);
}

// === Collector reuse and events ===

#[test]
fn collector_is_reset_between_batches() {
    let pipeline = Arc::new(StubPipeline::default());
    let pool = pool_with(pipeline, 2);

    pool.execute_parallel(&BuildContext::background(), &tasks(&["a.tex", "b.tex"]))
        .unwrap();
    assert!(pool.collector().is_complete(2));

    let second = pool
        .execute_parallel(&BuildContext::background(), &tasks(&["c.tex"]))
        .unwrap();

    assert_eq!(second.total_count(), 1);
    assert_eq!(pool.collector().total_count(), 1);
}

#[test]
fn events_bracket_the_batch() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    let mut pool = WorkerPool::new(Arc::new(StubPipeline::default().failing_on("b.tex")))
        .with_event_sink(Arc::new(move |event: BuildEvent| {
            events_clone.lock().unwrap().push(event)
        }));
    pool.configure_concurrency(1).unwrap();

    pool.execute_parallel(&BuildContext::background(), &tasks(&["a.tex", "b.tex"]))
        .unwrap();

    let captured = events.lock().unwrap();
    assert!(matches!(
        captured.first(),
        Some(BuildEvent::BatchStarted {
            tasks: 2,
            max_workers: 1
        })
    ));
    assert!(matches!(
        captured.last(),
        Some(BuildEvent::BatchCompleted {
            succeeded: 1,
            failed: 1,
            ..
        })
    ));
    assert_eq!(
        captured
            .iter()
            .filter(|e| matches!(e, BuildEvent::TaskStarted { .. }))
            .count(),
        2
    );
}
