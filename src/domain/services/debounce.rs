//! Debounce strategies for the watch loop
//!
//! `LastFireDebouncer` accepts an event only if at least one interval has
//! passed since the last accepted event. Suppressed events are dropped, not
//! queued. A final edit landing inside the window after an accepted one is
//! therefore not rebuilt until the next change; at human editing speed that
//! is an acceptable approximation.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::domain::entities::FileChangeEvent;
use crate::domain::value_objects::DebounceInterval;

/// Decides whether an event should fire now
pub trait DebounceStrategy: Send + Sync {
    fn should_trigger(&self, event: &FileChangeEvent) -> bool;

    /// Forget the last accepted event
    fn reset(&self);

    fn interval(&self) -> DebounceInterval;

    fn configure_interval(&self, interval: DebounceInterval);
}

#[derive(Debug)]
struct DebounceState {
    interval: DebounceInterval,
    last_fire: Option<Instant>,
}

/// Last-fire timestamp debouncer
///
/// Compares event timestamps rather than wall-clock reads, so the outcome
/// depends only on the event stream.
#[derive(Debug)]
pub struct LastFireDebouncer {
    state: Mutex<DebounceState>,
}

impl Default for LastFireDebouncer {
    fn default() -> Self {
        Self::new(DebounceInterval::default())
    }
}

impl LastFireDebouncer {
    pub fn new(interval: DebounceInterval) -> Self {
        Self {
            state: Mutex::new(DebounceState {
                interval,
                last_fire: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DebounceStrategy for LastFireDebouncer {
    fn should_trigger(&self, event: &FileChangeEvent) -> bool {
        let mut state = self.state();
        let fire = match state.last_fire {
            None => true,
            Some(last) => {
                event.timestamp.saturating_duration_since(last) >= state.interval.as_duration()
            }
        };
        if fire {
            state.last_fire = Some(event.timestamp);
        }
        fire
    }

    fn reset(&self) {
        self.state().last_fire = None;
    }

    fn interval(&self) -> DebounceInterval {
        self.state().interval
    }

    fn configure_interval(&self, interval: DebounceInterval) {
        self.state().interval = interval;
    }
}
