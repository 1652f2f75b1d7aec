//! Error types for texforge
//!
//! Library code returns typed errors built with `thiserror`; the binary wraps
//! them in `anyhow` at the command boundary.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for texforge operations
pub type TexforgeResult<T> = Result<T, TexforgeError>;

/// Main error type for texforge operations
#[derive(Error, Debug)]
pub enum TexforgeError {
    /// A caller supplied a value outside its accepted range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A duration string could not be parsed
    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    /// A glob pattern could not be compiled
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Configuration file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Batch manifest could not be parsed
    #[error("invalid manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Watch session errors
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// A single build failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Failure reported by a build pipeline for one document.
///
/// Cloneable so that outcomes can be snapshotted out of the result collector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The per-task deadline passed
    #[error("build timed out after {after:?}")]
    Timeout { after: Duration },

    /// The parent context was cancelled
    #[error("build cancelled")]
    Cancelled,

    /// An external command exited unsuccessfully
    #[error("`{program}` exited with {status}: {detail}")]
    CommandFailed {
        program: String,
        status: String,
        detail: String,
    },

    /// An external command could not be started
    #[error("failed to start `{program}`: {message}")]
    Spawn { program: String, message: String },

    /// Template rendering failed
    #[error("template {file}: {message}")]
    Template { file: PathBuf, message: String },

    /// Variables file could not be loaded
    #[error("variables {file}: {message}")]
    Variables { file: PathBuf, message: String },

    /// Filesystem error while preparing or collecting outputs
    #[error("{path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Another task in the same batch already writes this output
    #[error("{output} is already produced by {owner}")]
    OutputConflict { output: PathBuf, owner: PathBuf },

    /// Anything else a pipeline wants to report
    #[error("{0}")]
    Other(String),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// True for failures caused by the context rather than the document
    pub fn is_interrupted(&self) -> bool {
        matches!(self, BuildError::Timeout { .. } | BuildError::Cancelled)
    }
}

/// Watch session errors
#[derive(Error, Debug)]
pub enum WatchError {
    /// `start_watching` called on a session that is already running
    #[error("already watching; stop the current session first")]
    AlreadyWatching,

    /// A session that has been stopped cannot be restarted
    #[error("watch session has been stopped")]
    Stopped,

    /// Directory registration with the event source failed
    #[error("failed to watch {path}: {message}")]
    WatchSetupFailed { path: PathBuf, message: String },
}
