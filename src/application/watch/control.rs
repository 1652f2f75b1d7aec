//! Runtime control of a watch session
//!
//! Line-oriented commands read from stdin while watching:
//!
//! ```text
//! interval 2s          change the debounce interval (100ms..=10s)
//! exclude *.aux *.log  replace the exclusion list
//! include *.tex        replace the inclusion list (empty = everything)
//! status               print state, interval, and patterns
//! quit                 stop watching
//! ```

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::domain::services::{DebounceStrategy, PatternMatcher};
use crate::domain::value_objects::{parse_duration, DebounceInterval};
use crate::error::{TexforgeError, TexforgeResult};

use super::event::WatchState;
use super::service::SharedState;

/// A parsed control command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Interval(DebounceInterval),
    Exclude(Vec<String>),
    Include(Vec<String>),
    Status,
    Quit,
}

impl FromStr for WatchCommand {
    type Err = TexforgeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(TexforgeError::InvalidArgument("empty command".to_string()));
        };
        let rest: Vec<String> = words.map(str::to_string).collect();

        match verb {
            "interval" => {
                let [value] = rest.as_slice() else {
                    return Err(TexforgeError::InvalidArgument(
                        "usage: interval <duration>".to_string(),
                    ));
                };
                let interval = DebounceInterval::new(parse_duration(value)?)?;
                Ok(WatchCommand::Interval(interval))
            }
            "exclude" => Ok(WatchCommand::Exclude(rest)),
            "include" => Ok(WatchCommand::Include(rest)),
            "status" => Ok(WatchCommand::Status),
            "quit" | "exit" => Ok(WatchCommand::Quit),
            other => Err(TexforgeError::InvalidArgument(format!(
                "unknown command '{other}' (expected interval, exclude, include, status, quit)"
            ))),
        }
    }
}

/// What the caller should do after a command was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlReply {
    Message(String),
    Quit,
}

/// Applies control commands to a running session
#[derive(Clone)]
pub struct WatchController {
    matcher: Arc<PatternMatcher>,
    debouncer: Arc<dyn DebounceStrategy>,
    state: SharedState,
}

impl WatchController {
    pub(crate) fn new(
        matcher: Arc<PatternMatcher>,
        debouncer: Arc<dyn DebounceStrategy>,
        state: SharedState,
    ) -> Self {
        Self {
            matcher,
            debouncer,
            state,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state.get()
    }

    /// Parse and apply one input line
    pub fn execute(&self, line: &str) -> TexforgeResult<ControlReply> {
        self.apply(line.parse()?)
    }

    pub fn apply(&self, command: WatchCommand) -> TexforgeResult<ControlReply> {
        match command {
            WatchCommand::Interval(interval) => {
                self.debouncer.configure_interval(interval);
                info!(%interval, "debounce interval changed");
                Ok(ControlReply::Message(format!("debounce interval set to {interval}")))
            }
            WatchCommand::Exclude(patterns) => {
                self.matcher.configure_exclusions(&patterns)?;
                info!(patterns = ?patterns, "exclusions replaced");
                Ok(ControlReply::Message(format!(
                    "excluding {}",
                    describe(&patterns)
                )))
            }
            WatchCommand::Include(patterns) => {
                self.matcher.configure_inclusions(&patterns)?;
                info!(patterns = ?patterns, "inclusions replaced");
                Ok(ControlReply::Message(format!(
                    "including {}",
                    describe(&patterns)
                )))
            }
            WatchCommand::Status => Ok(ControlReply::Message(self.status())),
            WatchCommand::Quit => Ok(ControlReply::Quit),
        }
    }

    fn status(&self) -> String {
        let patterns = self.matcher.snapshot();
        format!(
            "state: {}, interval: {}, exclude: {}, include: {}",
            self.state.get(),
            self.debouncer.interval(),
            describe(&patterns.exclusions()),
            describe(&patterns.inclusions()),
        )
    }
}

fn describe(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "(none)".to_string()
    } else {
        patterns.join(" ")
    }
}
