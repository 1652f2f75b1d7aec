//! texforge - LaTeX templates to PDF
//!
//! texforge renders YAML variables into LaTeX templates and compiles the
//! result, either as a parallel batch driven by a manifest or continuously
//! while the sources are edited.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{DocumentPipeline, FileWatchService, WatchConfiguration, WorkerPool};
pub use config::Config;
pub use domain::entities::{CompilationTask, ParallelCompilationResult};
pub use domain::value_objects::{BuildContext, CancellationToken, DebounceInterval};
pub use error::{BuildError, TexforgeError, TexforgeResult, WatchError};
pub use infrastructure::{JsonEventSink, NotifyEventSource, ProcessExecutor};
