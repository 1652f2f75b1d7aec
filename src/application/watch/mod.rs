//! Watch Use Case
//!
//! Continuous rebuild of one document while its sources change.
//! It orchestrates:
//! - File system events (via a [`FileEventSource`](crate::domain::ports::FileEventSource))
//! - Include/exclude filtering (`PatternMatcher`)
//! - Debouncing (500ms default, tunable at runtime)
//! - Rebuilds through the build pipeline (`ChangeProcessor`)
//!
//! ## Usage
//!
//! ```ignore
//! let mut service = FileWatchService::new(pipeline, Box::new(NotifyEventSource::new()))
//!     .with_event_sink(sink);
//! service.start_watching(&WatchConfiguration::new("report.tex", "report.yaml"))?;
//! // ...
//! service.stop_watching()?;
//! ```

mod control;
mod event;
mod processor;
mod service;


pub use control::{ControlReply, WatchCommand, WatchController};
pub use event::{WatchConfiguration, WatchState};
pub use processor::ChangeProcessor;
pub use service::FileWatchService;
