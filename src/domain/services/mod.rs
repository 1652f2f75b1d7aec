//! Domain Services
//!
//! Stateful but I/O-free building blocks shared by the batch and watch flows.

pub mod debounce;
pub mod pattern_matcher;
pub mod result_collector;

pub use debounce::{DebounceStrategy, LastFireDebouncer};
pub use pattern_matcher::{PatternMatcher, PatternSet, DEFAULT_EXCLUSIONS, DEFAULT_INCLUSIONS};
pub use result_collector::ResultCollector;
