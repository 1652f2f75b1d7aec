//! Domain Layer
//!
//! Pure build-orchestration concepts without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Tasks, build outcomes, file change events
//! - `value_objects/` - Build context, debounce interval, durations
//! - `services/` - Result collector, pattern matcher, debounce strategy
//! - `ports/` - Build pipeline, command executor, event source, event sinks

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
