//! Watch Event Port
//!
//! Progress of a watch session, rendered as terminal lines or NDJSON.

use serde::Serialize;

use crate::domain::entities::FileOperation;

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted {
        template: String,
        config: String,
        watching: Vec<String>,
    },
    /// An accepted change is about to trigger a rebuild
    FileChanged {
        path: String,
        operation: FileOperation,
    },
    /// Rebuild started
    RebuildStarted,
    /// Rebuild produced a PDF
    RebuildComplete { pdf: String, duration_ms: u64 },
    /// Rebuild ran but did not succeed
    RebuildFailed { message: String },
    /// Event source or processing error
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Trait for receiving watch events
pub trait WatchEventSink: Send + Sync {
    fn on_event(&self, event: WatchEvent);
}

impl<F> WatchEventSink for F
where
    F: Fn(WatchEvent) + Send + Sync,
{
    fn on_event(&self, event: WatchEvent) {
        self(event)
    }
}

/// No-op event sink for silent operation
pub struct NoopWatchEventSink;

impl WatchEventSink for NoopWatchEventSink {
    fn on_event(&self, _event: WatchEvent) {}
}
