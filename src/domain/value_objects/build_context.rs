//! Build context: cooperative cancellation plus an optional deadline
//!
//! Contexts form a tree. A child created with [`BuildContext::with_timeout`]
//! shares its parent's cancellation token and never outlives the parent's
//! deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::BuildError;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Context handed to every build pipeline call
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

impl BuildContext {
    /// Context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Root context driven by an external token (e.g. Ctrl+C)
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
            timeout: None,
        }
    }

    /// Derive a child whose deadline is `timeout` from now, capped by the parent's.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let Some(candidate) = Instant::now().checked_add(timeout) else {
            return self.clone();
        };
        match self.deadline {
            Some(parent) if parent <= candidate => self.clone(),
            _ => Self {
                token: self.token.clone(),
                deadline: Some(candidate),
                timeout: Some(timeout),
            },
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Why this context is done, if it is.
    pub fn err(&self) -> Option<BuildError> {
        if self.token.is_cancelled() {
            return Some(BuildError::Cancelled);
        }
        match (self.deadline, self.timeout) {
            (Some(deadline), Some(after)) if Instant::now() >= deadline => {
                Some(BuildError::Timeout { after })
            }
            _ => None,
        }
    }

    pub fn check(&self) -> Result<(), BuildError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
