//! Property tests for watch path filtering.

use std::path::PathBuf;

use proptest::prelude::*;

use texforge::domain::services::{PatternMatcher, DEFAULT_EXCLUSIONS};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,12}").unwrap()
}

/// Extension-style entries of the default exclusion list (`*.aux`, ...)
fn byproduct_extension() -> impl Strategy<Value = &'static str> {
    let extensions: Vec<&'static str> = DEFAULT_EXCLUSIONS
        .iter()
        .filter_map(|p| p.strip_prefix("*."))
        .collect();
    proptest::sample::select(extensions)
}

fn directory() -> impl Strategy<Value = PathBuf> {
    proptest::collection::vec(segment(), 0..=4)
        .prop_map(|segments| segments.iter().collect::<PathBuf>())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: matching never panics, whatever the path or pattern.
    #[test]
    fn property_matches_never_panics(path in "(?s).{0,128}", pattern in "(?s).{0,32}") {
        let _ = PatternMatcher::matches(&PathBuf::from(path), &[pattern.as_str()]);
        let _ = PatternMatcher::validate_pattern(&pattern);
    }

    /// PROPERTY: a byproduct is excluded wherever it lives.
    #[test]
    fn property_byproducts_excluded_in_any_directory(
        dir in directory(),
        stem in segment(),
        extension in byproduct_extension(),
    ) {
        let path = dir.join(format!("{stem}.{extension}"));
        let matcher = PatternMatcher::with_defaults();

        prop_assert!(matcher.should_exclude(&path));
        prop_assert!(!matcher.admits(&path));
    }

    /// PROPERTY: exclusion wins over inclusion.
    #[test]
    fn property_exclusion_wins(dir in directory(), stem in segment()) {
        let path = dir.join(format!("{stem}.tex"));
        let matcher = PatternMatcher::from_patterns(&["*.tex"], &["*.tex"]).unwrap();

        prop_assert!(!matcher.admits(&path));
    }

    /// PROPERTY: with no inclusion list, anything not excluded is admitted.
    #[test]
    fn property_empty_inclusions_admit_everything(dir in directory(), name in segment()) {
        let matcher = PatternMatcher::from_patterns::<&str, &str>(&[], &[]).unwrap();
        prop_assert!(matcher.admits(&dir.join(name)));
    }
}
