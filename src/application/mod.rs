//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `WorkerPool` - Compiles a batch of documents with bounded concurrency
//! - `FileWatchService` - Rebuilds one document whenever its sources change
//! - `DocumentPipeline` - Render, compile, rasterize and clean a single document

pub mod parallel;
pub mod pipeline;
pub mod watch;

pub use parallel::{WorkerPool, DEFAULT_MAX_WORKERS, DEFAULT_TASK_TIMEOUT};
pub use pipeline::{DocumentPipeline, ImageOptions, PipelineOptions};
pub use watch::{
    ChangeProcessor, ControlReply, FileWatchService, WatchCommand, WatchConfiguration,
    WatchController, WatchState,
};
