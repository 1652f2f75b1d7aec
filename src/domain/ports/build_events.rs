//! Build Event Port
//!
//! Observable progress for batch builds. Sinks are passed explicitly to the
//! worker pool; nothing is looked up from ambient state.

use serde::Serialize;

/// Event emitted while a batch runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    /// Batch dispatch started
    BatchStarted { tasks: usize, max_workers: usize },
    /// A task was admitted to the pipeline
    TaskStarted { template: String },
    /// A task produced a PDF
    TaskSucceeded {
        template: String,
        pdf: String,
        duration_ms: u64,
    },
    /// A task failed, timed out, or was cancelled
    TaskFailed {
        template: String,
        error: String,
        duration_ms: u64,
    },
    /// Every task has an outcome
    BatchCompleted {
        succeeded: usize,
        failed: usize,
        duration_ms: u64,
    },
}

impl BuildEvent {
    /// Convert to JSON string with "command": "batch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("batch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Trait for receiving build events
///
/// Called from worker threads, hence `Send + Sync`.
pub trait BuildEventSink: Send + Sync {
    fn on_event(&self, event: BuildEvent);
}

impl<F> BuildEventSink for F
where
    F: Fn(BuildEvent) + Send + Sync,
{
    fn on_event(&self, event: BuildEvent) {
        self(event)
    }
}

/// No-op event sink for silent operation
pub struct NoopBuildEventSink;

impl BuildEventSink for NoopBuildEventSink {
    fn on_event(&self, _event: BuildEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn to_json_adds_command_field() {
        let event = BuildEvent::TaskFailed {
            template: "b.tex".to_string(),
            error: "`pdflatex` exited with exit status 1: \"oops\"".to_string(),
            duration_ms: 12,
        };
        let json = event.to_json();
        assert!(json.contains("\"event\":\"task_failed\""));
        assert!(json.contains("\"command\":\"batch\""));
        assert!(json.contains("\\\"oops\\\""));
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink = move |event: BuildEvent| seen_clone.lock().unwrap().push(event);

        sink.on_event(BuildEvent::BatchStarted {
            tasks: 2,
            max_workers: 1,
        });

        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
