//! JSON Event Sink
//!
//! Outputs batch and watch events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{BuildEvent, BuildEventSink, WatchEvent, WatchEventSink};

/// Event sink that writes one JSON object per line
pub struct JsonEventSink {
    /// Workers emit concurrently; each line is written whole
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_line(&self, line: &str) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        self.write_line(&event.to_json());
    }
}

impl WatchEventSink for JsonEventSink {
    fn on_event(&self, event: WatchEvent) {
        self.write_line(&event.to_json());
    }
}
