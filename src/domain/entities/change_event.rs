//! Filesystem change events as seen by the watch pipeline

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Kind of change reported by the event source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    Write,
    Create,
    Remove,
    Rename,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileOperation::Write => "write",
            FileOperation::Create => "create",
            FileOperation::Remove => "remove",
            FileOperation::Rename => "rename",
        };
        f.write_str(name)
    }
}

/// One observed change to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    pub file_path: PathBuf,
    pub operation: FileOperation,
    pub timestamp: Instant,
}

impl FileChangeEvent {
    /// Event stamped with the current instant
    pub fn new(file_path: impl Into<PathBuf>, operation: FileOperation) -> Self {
        Self::at(file_path, operation, Instant::now())
    }

    pub fn at(file_path: impl Into<PathBuf>, operation: FileOperation, timestamp: Instant) -> Self {
        Self {
            file_path: file_path.into(),
            operation,
            timestamp,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}
