//! Batch contracts
//!
//! - Every submitted task gets exactly one outcome
//! - No more than `max_workers` builds run at once
//! - One failing document never affects its siblings
//! - The CLI exits non-zero when any document failed

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use texforge::domain::ports::{BuildEvent, BuildOutput, BuildPipeline, BuildRequest, RebuildResult};
use texforge::{BuildContext, BuildError, CompilationTask, WorkerPool};

#[cfg(unix)]
use crate::common::*;

struct CountingPipeline {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl CountingPipeline {
    fn new() -> Self {
        Self {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

impl BuildPipeline for CountingPipeline {
    fn build(&self, ctx: &BuildContext, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        self.active.fetch_sub(1, Ordering::SeqCst);
        ctx.check()?;

        let name = request.template_file.to_string_lossy();
        if name.contains("broken") {
            return Err(BuildError::Other(format!("{name} is broken")));
        }
        Ok(BuildOutput {
            pdf_path: request.template_file.with_extension("pdf"),
            images: Vec::new(),
        })
    }

    fn rebuild(&self, _ctx: &BuildContext, _t: &Path, _c: &Path) -> Result<RebuildResult, BuildError> {
        Ok(RebuildResult::default())
    }
}

fn tasks(n: usize) -> Vec<CompilationTask> {
    (0..n)
        .map(|i| {
            let template = if i % 4 == 3 {
                format!("broken-{i}.tex")
            } else {
                format!("doc-{i}.tex")
            };
            CompilationTask::new(template, format!("doc-{i}.yaml"))
        })
        .collect()
}

/// CONTRACT: outcomes partition the submitted tasks
#[test]
fn contract_every_task_has_exactly_one_outcome() {
    let mut pool = WorkerPool::new(Arc::new(CountingPipeline::new()));
    pool.configure_concurrency(3).unwrap();
    let tasks = tasks(12);

    let result = pool.execute_parallel(&BuildContext::background(), &tasks).unwrap();

    assert_eq!(result.total_count(), 12);
    assert_eq!(result.failure_count, 3);
    assert_eq!(result.success_count, 9);
    let expected: std::collections::BTreeSet<_> =
        tasks.iter().map(|t| t.template_file().to_path_buf()).collect();
    assert_eq!(result.templates(), expected);
}

/// CONTRACT: the pool never exceeds its configured width
#[test]
fn contract_concurrency_never_exceeds_max_workers() {
    let pipeline = Arc::new(CountingPipeline::new());
    let mut pool = WorkerPool::new(pipeline.clone());
    pool.configure_concurrency(2).unwrap();

    pool.execute_parallel(&BuildContext::background(), &tasks(10))
        .unwrap();

    let peak = pipeline.peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 2, "peak concurrency was {peak}");
}

/// CONTRACT: events bracket the batch and report each task once
#[test]
fn contract_events_bracket_the_batch() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let pool = WorkerPool::new(Arc::new(CountingPipeline::new()))
        .with_event_sink(Arc::new(move |event: BuildEvent| sink.lock().unwrap().push(event)));

    pool.execute_parallel(&BuildContext::background(), &tasks(4))
        .unwrap();

    let events = seen.lock().unwrap();
    assert!(matches!(events.first(), Some(BuildEvent::BatchStarted { tasks: 4, .. })));
    assert!(matches!(
        events.last(),
        Some(BuildEvent::BatchCompleted {
            succeeded: 3,
            failed: 1,
            ..
        })
    ));
    let finished = events
        .iter()
        .filter(|e| matches!(e, BuildEvent::TaskSucceeded { .. } | BuildEvent::TaskFailed { .. }))
        .count();
    assert_eq!(finished, 4);
}

/// CONTRACT: `texforge batch` builds the good documents and exits non-zero
#[cfg(unix)]
#[test]
fn contract_cli_batch_reports_partial_failure() {
    let env = TestEnv::new();
    let engine = fake_engine(env.project_root.path());
    env.document("alpha", TEMPLATE, "Ada");
    env.document("beta", FAILING_TEMPLATE, "Grace");
    env.document("gamma", TEMPLATE, "Alan");
    env.write(
        "batch.yaml",
        "- template: alpha.tex\n  config: alpha.yaml\n\
         - template: beta.tex\n  config: beta.yaml\n\
         - template: gamma.tex\n  config: gamma.yaml\n  priority: 5\n",
    );

    let result = env.run_with_env(
        &["--json", "batch", "batch.yaml", "-j", "2"],
        &[("TEXFORGE_ENGINE", engine.to_str().unwrap())],
    );

    assert!(!result.success, "stdout: {}\nstderr: {}", result.stdout, result.stderr);
    assert_eq!(result.exit_code, 1);

    let events = result.events();
    assert_eq!(events.first().unwrap()["event"], "batch_started");
    let last = events.last().unwrap();
    assert_eq!(last["event"], "batch_completed");
    assert_eq!(last["succeeded"], 2);
    assert_eq!(last["failed"], 1);
    assert!(events.iter().all(|e| e["command"] == "batch"));

    assert!(env.path("build/alpha.pdf").is_file());
    assert!(env.path("build/gamma.pdf").is_file());
    assert!(!env.path("build/beta.pdf").exists());
    assert!(!env.path("build/alpha.aux").exists());
}

/// CONTRACT: a clean batch exits zero
#[cfg(unix)]
#[test]
fn contract_cli_batch_success_exits_zero() {
    let env = TestEnv::new();
    let engine = fake_engine(env.project_root.path());
    env.document("alpha", TEMPLATE, "Ada");
    env.write("batch.yaml", "- template: alpha.tex\n  config: alpha.yaml\n");

    let result = env.run_with_env(
        &["batch", "batch.yaml"],
        &[("TEXFORGE_ENGINE", engine.to_str().unwrap())],
    );

    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("1 of 1 documents built"));
}

/// CONTRACT: one template with several variables files yields one PDF each
#[cfg(unix)]
#[test]
fn contract_cli_batch_shared_template_keeps_every_document() {
    let env = TestEnv::new();
    let engine = fake_engine(env.project_root.path());
    env.write("letter.tex", TEMPLATE);
    env.write("people/ada.yaml", "name: Ada\n");
    env.write("people/grace.yaml", "name: Grace\n");
    env.write(
        "batch.yaml",
        "- template: letter.tex\n  config: people/ada.yaml\n\
         - template: letter.tex\n  config: people/grace.yaml\n",
    );

    let result = env.run_with_env(
        &["--json", "batch", "batch.yaml", "-j", "2"],
        &[("TEXFORGE_ENGINE", engine.to_str().unwrap())],
    );

    assert!(result.success, "stdout: {}\nstderr: {}", result.stdout, result.stderr);
    let last = result.events().pop().unwrap();
    assert_eq!(last["succeeded"], 2);
    assert_eq!(last["failed"], 0);

    let ada = std::fs::read_to_string(env.path("build/letter-ada.pdf")).unwrap();
    let grace = std::fs::read_to_string(env.path("build/letter-grace.pdf")).unwrap();
    assert!(ada.contains("Hello Ada"));
    assert!(grace.contains("Hello Grace"));
    assert!(!env.path("build/letter.pdf").exists());
}
