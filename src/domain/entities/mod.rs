//! Domain Entities

mod change_event;
mod outcome;
mod task;

pub use change_event::{FileChangeEvent, FileOperation};
pub use outcome::{BuildFailure, BuildResult, ParallelCompilationResult};
pub use task::CompilationTask;
