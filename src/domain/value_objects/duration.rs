//! Human-readable durations (`"500ms"`, `"1m 30s"`, `"2min"`)
//!
//! Used by CLI flags, environment overrides, and the watch control channel.
//! Config and manifest fields go through `humantime_serde` directly.

use std::time::Duration;

use crate::error::{TexforgeError, TexforgeResult};

/// Parse a duration such as `500ms`, `30s` or `1m 30s`.
pub fn parse_duration(input: &str) -> TexforgeResult<Duration> {
    humantime::parse_duration(input.trim()).map_err(|e| TexforgeError::InvalidDuration {
        value: input.to_string(),
        reason: e.to_string(),
    })
}

/// Render a duration the way [`parse_duration`] reads it back.
pub fn format_duration(d: Duration) -> String {
    humantime::format_duration(d).to_string()
}
