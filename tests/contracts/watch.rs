//! Watch contracts, against the real filesystem backend
//!
//! - A write to the template triggers a rebuild
//! - Writes to excluded byproducts never do
//! - A session cannot be started twice, and stops exactly once

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use texforge::domain::ports::{BuildOutput, BuildPipeline, BuildRequest, RebuildResult, WatchEvent};
use texforge::{
    BuildContext, BuildError, DebounceInterval, FileWatchService, NotifyEventSource,
    TexforgeError, WatchConfiguration, WatchError,
};

#[derive(Default)]
struct RecordingPipeline {
    rebuilds: Mutex<Vec<PathBuf>>,
}

impl RecordingPipeline {
    fn count(&self) -> usize {
        self.rebuilds.lock().unwrap().len()
    }
}

impl BuildPipeline for RecordingPipeline {
    fn build(&self, _ctx: &BuildContext, _request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        Ok(BuildOutput::default())
    }

    fn rebuild(&self, _ctx: &BuildContext, template: &Path, _config: &Path) -> Result<RebuildResult, BuildError> {
        self.rebuilds.lock().unwrap().push(template.to_path_buf());
        Ok(RebuildResult::succeeded(template.with_extension("pdf")))
    }
}

fn wait_for(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    condition()
}

struct Session {
    _dir: tempfile::TempDir,
    template: PathBuf,
    root: PathBuf,
    pipeline: Arc<RecordingPipeline>,
    events: Arc<Mutex<Vec<WatchEvent>>>,
    service: FileWatchService,
    config: WatchConfiguration,
}

fn session() -> Session {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let template = root.join("report.tex");
    let config_file = root.join("report.yaml");
    fs::write(&template, "\\documentclass{article}\n").unwrap();
    fs::write(&config_file, "title: Q3\n").unwrap();

    let pipeline = Arc::new(RecordingPipeline::default());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let service = FileWatchService::new(pipeline.clone(), Box::new(NotifyEventSource::new()))
        .with_event_sink(Arc::new(move |event: WatchEvent| sink.lock().unwrap().push(event)));
    let config = WatchConfiguration::new(&template, &config_file)
        .with_debounce(DebounceInterval::new(Duration::from_millis(100)).unwrap());

    Session {
        _dir: dir,
        template,
        root,
        pipeline,
        events,
        service,
        config,
    }
}

/// CONTRACT: saving the template rebuilds it
#[test]
fn contract_template_write_triggers_rebuild() {
    let mut s = session();
    s.service.start_watching(&s.config).unwrap();

    fs::write(&s.template, "\\documentclass{article}\n% edited\n").unwrap();

    assert!(
        wait_for(Duration::from_secs(5), || s.pipeline.count() >= 1),
        "no rebuild after writing the template"
    );
    assert!(s.pipeline.rebuilds.lock().unwrap()[0].is_absolute());
    s.service.stop_watching().unwrap();
}

/// CONTRACT: byproducts matching the exclusion list never rebuild
#[test]
fn contract_excluded_files_never_rebuild() {
    let mut s = session();
    s.service.start_watching(&s.config).unwrap();

    fs::write(s.root.join("report.aux"), "\\relax\n").unwrap();
    fs::write(s.root.join("report.log"), "This is pdfTeX\n").unwrap();
    thread::sleep(Duration::from_millis(600));

    assert_eq!(s.pipeline.count(), 0);
    s.service.stop_watching().unwrap();
}

/// CONTRACT: one session at a time; stop is idempotent and final
#[test]
fn contract_session_lifecycle() {
    let mut s = session();
    s.service.start_watching(&s.config).unwrap();

    let err = s.service.start_watching(&s.config).unwrap_err();
    assert!(matches!(err, TexforgeError::Watch(WatchError::AlreadyWatching)));

    s.service.stop_watching().unwrap();
    s.service.stop_watching().unwrap();

    let shutdowns = s
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, WatchEvent::Shutdown))
        .count();
    assert_eq!(shutdowns, 1);

    let err = s.service.start_watching(&s.config).unwrap_err();
    assert!(matches!(err, TexforgeError::Watch(WatchError::Stopped)));
}

/// CONTRACT: an unregisterable directory leaves the session startable
#[test]
fn contract_setup_failure_is_recoverable() {
    let mut s = session();
    let missing = WatchConfiguration::new("/nonexistent/texforge/report.tex", "/nonexistent/texforge/report.yaml");

    let err = s.service.start_watching(&missing).unwrap_err();
    assert!(matches!(err, TexforgeError::Watch(WatchError::WatchSetupFailed { .. })));

    s.service.start_watching(&s.config).unwrap();
    s.service.stop_watching().unwrap();
}
