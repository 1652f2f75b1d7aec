//! Event Sink Implementations
//!
//! Concrete implementations of `BuildEventSink` and `WatchEventSink`:
//! - JsonEventSink: NDJSON output for CI/automation
//!
//! Human-readable output lives in the binary's `ui` module.

mod json;

pub use json::JsonEventSink;
