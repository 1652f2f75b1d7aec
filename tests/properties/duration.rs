//! Property tests for duration strings.

use std::time::Duration;

use proptest::prelude::*;

use texforge::domain::value_objects::{format_duration, parse_duration};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,64}") {
        let _ = parse_duration(&s);
    }

    /// PROPERTY: whole-millisecond durations survive formatting.
    #[test]
    fn property_millisecond_durations_reparse(ms in 0u64..10_000_000) {
        let d = Duration::from_millis(ms);
        prop_assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
    }
}
