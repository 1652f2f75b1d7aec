//! File Watch Service implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::domain::entities::FileChangeEvent;
use crate::domain::ports::{
    BuildPipeline, FileEventSource, NoopWatchEventSink, SourceMessage, WatchEvent, WatchEventSink,
};
use crate::domain::services::{DebounceStrategy, LastFireDebouncer, PatternMatcher};
use crate::domain::value_objects::CancellationToken;
use crate::error::{TexforgeResult, WatchError};

use super::control::WatchController;
use super::event::{WatchConfiguration, WatchState};
use super::processor::ChangeProcessor;

/// How long the loop blocks on the source before re-checking the running flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Session state shared between the service, its loop thread, and controllers
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<Mutex<WatchState>>);

impl SharedState {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(WatchState::Idle)))
    }

    pub(crate) fn get(&self) -> WatchState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, state: WatchState) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Watches one document's sources and rebuilds it on change
///
/// Events flow through the pattern matcher, the change processor's
/// admission check, and the debouncer before a rebuild runs. Rebuilds run
/// on the loop thread itself, so two rebuilds never overlap.
pub struct FileWatchService {
    pipeline: Arc<dyn BuildPipeline>,
    source: Box<dyn FileEventSource>,
    matcher: Arc<PatternMatcher>,
    debouncer: Arc<dyn DebounceStrategy>,
    events: Arc<dyn WatchEventSink>,
    rebuild_timeout: Option<Duration>,
    token: CancellationToken,
    state: SharedState,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FileWatchService {
    pub fn new(pipeline: Arc<dyn BuildPipeline>, source: Box<dyn FileEventSource>) -> Self {
        Self {
            pipeline,
            source,
            matcher: Arc::new(PatternMatcher::with_defaults()),
            debouncer: Arc::new(LastFireDebouncer::default()),
            events: Arc::new(NoopWatchEventSink),
            rebuild_timeout: None,
            token: CancellationToken::new(),
            state: SharedState::new(),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn WatchEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_debouncer(mut self, debouncer: Arc<dyn DebounceStrategy>) -> Self {
        self.debouncer = debouncer;
        self
    }

    /// Bound each rebuild by a deadline
    pub fn with_rebuild_timeout(mut self, timeout: Duration) -> Self {
        self.rebuild_timeout = Some(timeout);
        self
    }

    /// Token observed by in-flight rebuilds
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn state(&self) -> WatchState {
        self.state.get()
    }

    pub fn matcher(&self) -> &Arc<PatternMatcher> {
        &self.matcher
    }

    pub fn debouncer(&self) -> &Arc<dyn DebounceStrategy> {
        &self.debouncer
    }

    /// Handle for reconfiguring the running session from another thread
    pub fn controller(&self) -> WatchController {
        WatchController::new(
            self.matcher.clone(),
            self.debouncer.clone(),
            self.state.clone(),
        )
    }

    /// Register the document's directories and start the event loop.
    ///
    /// On failure the session stays `Idle`.
    pub fn start_watching(&mut self, config: &WatchConfiguration) -> TexforgeResult<()> {
        match self.state.get() {
            WatchState::Idle => {}
            WatchState::Watching | WatchState::Rebuilding => {
                return Err(WatchError::AlreadyWatching.into())
            }
            WatchState::Stopped => return Err(WatchError::Stopped.into()),
        }

        self.matcher.configure_exclusions(&config.exclusion_patterns)?;
        self.matcher.configure_inclusions(&config.inclusion_patterns)?;
        self.debouncer.configure_interval(config.debounce_interval);
        self.debouncer.reset();

        let dirs = config.watch_dirs();
        let rx = self.source.subscribe(&dirs)?;
        for dir in &dirs {
            debug!(path = %dir.path.display(), recursive = dir.recursive, "registered watch directory");
        }

        let mut processor =
            ChangeProcessor::new(self.pipeline.clone(), &config.template_file, &config.config_file)
                .with_token(self.token.clone());
        if let Some(timeout) = self.rebuild_timeout {
            processor = processor.with_timeout(timeout);
        }

        let event_loop = EventLoop {
            matcher: self.matcher.clone(),
            debouncer: self.debouncer.clone(),
            processor,
            events: self.events.clone(),
            state: self.state.clone(),
            running: self.running.clone(),
        };

        self.running.store(true, Ordering::SeqCst);
        self.state.set(WatchState::Watching);
        let spawned = thread::Builder::new()
            .name("texforge-watch".to_string())
            .spawn(move || event_loop.run(rx));
        match spawned {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                self.source.close();
                self.state.set(WatchState::Idle);
                return Err(e.into());
            }
        }

        info!(
            template = %config.template_file.display(),
            interval = %config.debounce_interval,
            "watching for changes"
        );
        self.events.on_event(WatchEvent::WatchStarted {
            template: config.template_file.display().to_string(),
            config: config.config_file.display().to_string(),
            watching: dirs.iter().map(|d| d.path.display().to_string()).collect(),
        });
        Ok(())
    }

    /// Stop the session and wait for the loop to exit.
    ///
    /// An in-flight rebuild is allowed to finish. Calling this again, or on
    /// a session that never started, is a no-op that returns `Ok`. A session
    /// whose source went away on its own is still joined and shut down here.
    pub fn stop_watching(&mut self) -> TexforgeResult<()> {
        if self.state.get() == WatchState::Stopped && self.handle.is_none() {
            return Ok(());
        }

        self.running.store(false, Ordering::SeqCst);
        self.source.close();

        let was_running = self.handle.is_some();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("watch loop panicked");
            }
        }
        self.state.set(WatchState::Stopped);

        if was_running {
            info!("watch stopped");
            self.events.on_event(WatchEvent::Shutdown);
        }
        Ok(())
    }
}

impl Drop for FileWatchService {
    fn drop(&mut self) {
        let _ = self.stop_watching();
    }
}

/// Everything the loop thread owns
struct EventLoop {
    matcher: Arc<PatternMatcher>,
    debouncer: Arc<dyn DebounceStrategy>,
    processor: ChangeProcessor,
    events: Arc<dyn WatchEventSink>,
    state: SharedState,
    running: Arc<AtomicBool>,
}

impl EventLoop {
    fn run(self, rx: Receiver<SourceMessage>) {
        while self.running.load(Ordering::SeqCst) {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(SourceMessage::Event(event)) => self.handle(event),
                Ok(SourceMessage::Error(message)) => {
                    warn!("event source error: {message}");
                    self.events.on_event(WatchEvent::Error { message });
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // `stop_watching` clears the flag before closing the source.
                    if self.running.swap(false, Ordering::SeqCst) {
                        error!("event source closed unexpectedly");
                        self.state.set(WatchState::Stopped);
                        self.events.on_event(WatchEvent::Error {
                            message: "file event source closed; no longer watching".to_string(),
                        });
                    } else {
                        debug!("event source closed");
                    }
                    break;
                }
            }
        }
    }

    fn handle(&self, event: FileChangeEvent) {
        let path = event.path();

        if !self.matcher.snapshot().admits(path) {
            trace!(path = %path.display(), "filtered");
            return;
        }
        if !self.processor.can_process(&event) {
            trace!(path = %path.display(), operation = %event.operation, "ignored");
            return;
        }
        if !self.debouncer.should_trigger(&event) {
            debug!(path = %path.display(), "debounced");
            return;
        }

        info!(path = %path.display(), operation = %event.operation, "change accepted");
        self.events.on_event(WatchEvent::FileChanged {
            path: path.display().to_string(),
            operation: event.operation,
        });

        self.state.set(WatchState::Rebuilding);
        self.events.on_event(WatchEvent::RebuildStarted);
        let started = Instant::now();

        let outcome = self.processor.process_change(&event);
        let duration_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(result) if result.success => {
                let pdf = result
                    .pdf_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                info!(pdf = %pdf, duration_ms, "rebuild complete");
                self.events
                    .on_event(WatchEvent::RebuildComplete { pdf, duration_ms });
            }
            Ok(result) => {
                let message = result
                    .error
                    .unwrap_or_else(|| "rebuild failed".to_string());
                warn!(duration_ms, "rebuild failed: {message}");
                self.events.on_event(WatchEvent::RebuildFailed { message });
            }
            Err(err) => {
                error!(duration_ms, "rebuild error: {err}");
                self.events.on_event(WatchEvent::RebuildFailed {
                    message: err.to_string(),
                });
            }
        }

        self.state.set(WatchState::Watching);
    }
}
