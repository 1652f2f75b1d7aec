//! Debounce interval value object
//!
//! A quiet interval for the watch debouncer, always within 100ms..=10s.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::duration::{format_duration, parse_duration};
use crate::error::{TexforgeError, TexforgeResult};

/// Validated debounce interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DebounceInterval(Duration);

impl DebounceInterval {
    /// Shortest accepted interval
    pub const MIN: Duration = Duration::from_millis(100);
    /// Longest accepted interval
    pub const MAX: Duration = Duration::from_secs(10);
    /// Interval used when nothing is configured
    pub const DEFAULT: Duration = Duration::from_millis(500);

    pub fn new(interval: Duration) -> TexforgeResult<Self> {
        if interval < Self::MIN || interval > Self::MAX {
            return Err(TexforgeError::InvalidArgument(format!(
                "debounce interval {} is outside {}..={}",
                format_duration(interval),
                format_duration(Self::MIN),
                format_duration(Self::MAX)
            )));
        }
        Ok(Self(interval))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for DebounceInterval {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl FromStr for DebounceInterval {
    type Err = TexforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parse_duration(s)?)
    }
}

impl TryFrom<String> for DebounceInterval {
    type Error = TexforgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DebounceInterval> for String {
    fn from(value: DebounceInterval) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DebounceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}
