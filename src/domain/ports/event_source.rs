//! File Event Source port
//!
//! Wraps an OS notification backend. Change events and backend errors share a
//! single channel so the watch loop only ever blocks on one receiver.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use crate::domain::entities::FileChangeEvent;
use crate::error::WatchError;

/// Message delivered by an event source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMessage {
    Event(FileChangeEvent),
    /// Backend error; informational, the source keeps running
    Error(String),
}

/// Directory to register with the source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchDir {
    pub path: PathBuf,
    pub recursive: bool,
}

impl WatchDir {
    pub fn flat(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
        }
    }

    pub fn recursive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: true,
        }
    }
}

pub trait FileEventSource: Send {
    /// Register `dirs` and start delivering messages.
    ///
    /// The returned receiver disconnects once the source is closed.
    fn subscribe(&mut self, dirs: &[WatchDir]) -> Result<Receiver<SourceMessage>, WatchError>;

    /// Stop delivering messages. Calling it again is a no-op.
    fn close(&mut self);
}
