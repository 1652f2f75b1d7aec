//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_events;
pub mod build_pipeline;
pub mod command_executor;
pub mod event_source;
pub mod watch_events;

pub use build_events::{BuildEvent, BuildEventSink, NoopBuildEventSink};
pub use build_pipeline::{BuildOutput, BuildPipeline, BuildRequest, RebuildResult};
pub use command_executor::{CommandExecutor, CommandOutput, CommandSpec};
pub use event_source::{FileEventSource, SourceMessage, WatchDir};
pub use watch_events::{NoopWatchEventSink, WatchEvent, WatchEventSink};
