//! `notify`-backed file event source

use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

use crate::domain::entities::{FileChangeEvent, FileOperation};
use crate::domain::ports::{FileEventSource, SourceMessage, WatchDir};
use crate::error::WatchError;

/// Event source using the platform's recommended watcher
#[derive(Default)]
pub struct NotifyEventSource {
    watcher: Option<RecommendedWatcher>,
}

impl NotifyEventSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileEventSource for NotifyEventSource {
    fn subscribe(&mut self, dirs: &[WatchDir]) -> Result<Receiver<SourceMessage>, WatchError> {
        if self.watcher.is_some() {
            return Err(WatchError::AlreadyWatching);
        }

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| forward(&tx, res),
            Config::default(),
        )
        .map_err(|e| setup_failed(dirs.first().map(|d| d.path.as_path()), e))?;

        for dir in dirs {
            let mode = if dir.recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher
                .watch(&dir.path, mode)
                .map_err(|e| setup_failed(Some(&dir.path), e))?;
            debug!(path = %dir.path.display(), recursive = dir.recursive, "watching");
        }

        self.watcher = Some(watcher);
        Ok(rx)
    }

    fn close(&mut self) {
        // Dropping the watcher drops its sender, which disconnects the receiver.
        self.watcher = None;
    }
}

fn setup_failed(path: Option<&Path>, err: notify::Error) -> WatchError {
    WatchError::WatchSetupFailed {
        path: path.map(Path::to_path_buf).unwrap_or_default(),
        message: err.to_string(),
    }
}

fn forward(tx: &Sender<SourceMessage>, res: notify::Result<Event>) {
    match res {
        Ok(event) => {
            let Some(operation) = operation_for(&event.kind) else {
                trace!(kind = ?event.kind, "ignored notify event");
                return;
            };
            for path in event.paths {
                let _ = tx.send(SourceMessage::Event(FileChangeEvent::new(path, operation)));
            }
        }
        Err(e) => {
            let _ = tx.send(SourceMessage::Error(e.to_string()));
        }
    }
}

/// Map a notify event kind onto the operations the watch loop understands.
///
/// Access and metadata-only changes carry no new content and are dropped.
pub(crate) fn operation_for(kind: &EventKind) -> Option<FileOperation> {
    match kind {
        EventKind::Create(_) => Some(FileOperation::Create),
        EventKind::Remove(_) => Some(FileOperation::Remove),
        EventKind::Modify(ModifyKind::Name(_)) => Some(FileOperation::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(FileOperation::Write),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
