//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process` - External command execution with deadline enforcement
//! - `notify_source` - Filesystem events from the platform watcher
//! - `template` - Placeholder rendering and variables loading
//! - `manifest` - Batch manifest parsing
//! - `cleanup` - Engine byproduct removal
//! - `events/` - NDJSON event sinks

pub mod cleanup;
pub mod events;
pub mod manifest;
pub mod notify_source;
pub mod process;
pub mod template;

// Re-export for convenience
pub use events::JsonEventSink;
pub use manifest::load_manifest;
pub use notify_source::NotifyEventSource;
pub use process::ProcessExecutor;
pub use template::TemplateRenderer;
