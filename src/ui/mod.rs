//! Human-readable terminal output
//!
//! Views render domain events into strings; commands decide where they go.

pub mod blocks;
pub mod context;
pub mod primitives;
pub mod terminal;
pub mod theme;
pub mod views;
