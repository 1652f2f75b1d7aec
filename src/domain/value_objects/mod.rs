//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod build_context;
mod debounce_interval;
pub mod duration;

pub use build_context::{BuildContext, CancellationToken};
pub use debounce_interval::DebounceInterval;
pub use duration::{format_duration, parse_duration};
