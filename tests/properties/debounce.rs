//! Property tests for the debounce interval range and the last-fire strategy.

use std::time::{Duration, Instant};

use proptest::prelude::*;

use texforge::domain::entities::{FileChangeEvent, FileOperation};
use texforge::domain::services::{DebounceStrategy, LastFireDebouncer};
use texforge::DebounceInterval;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: an interval is accepted iff it lies within 100ms..=10s.
    #[test]
    fn property_interval_range(ms in 0u64..20_000) {
        let accepted = DebounceInterval::new(Duration::from_millis(ms)).is_ok();
        prop_assert_eq!(accepted, (100..=10_000).contains(&ms));
    }

    /// PROPERTY: accepted events are always at least one interval apart.
    #[test]
    fn property_accepted_events_are_spaced(
        gaps in proptest::collection::vec(0u64..400, 1..40),
        interval_ms in 100u64..300,
    ) {
        let interval = DebounceInterval::new(Duration::from_millis(interval_ms)).unwrap();
        let debouncer = LastFireDebouncer::new(interval);
        let start = Instant::now();

        let mut offset = 0;
        let mut accepted = Vec::new();
        for gap in gaps {
            offset += gap;
            let at = start + Duration::from_millis(offset);
            let event = FileChangeEvent::at("report.tex", FileOperation::Write, at);
            if debouncer.should_trigger(&event) {
                accepted.push(offset);
            }
        }

        prop_assert!(!accepted.is_empty());
        for pair in accepted.windows(2) {
            prop_assert!(pair[1] - pair[0] >= interval_ms);
        }
    }
}
