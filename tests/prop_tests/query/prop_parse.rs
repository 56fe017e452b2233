use areaquery::query::{ParseConfidence, parse_filter_list, parse_filter_list_detailed};
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 256,
        .. proptest::test_runner::Config::default()
    })]

    #[test]
    fn prop_parser_is_total_on_text(s in ".{0,80}") {
        let parsed = parse_filter_list_detailed(s.as_str());
        prop_assert_eq!(parsed.tags.is_empty(), parsed.confidence == ParseConfidence::Empty);
        for tag in &parsed.tags {
            prop_assert_eq!(tag.trim(), tag.as_str());
        }
    }

    #[test]
    fn prop_parser_is_total_on_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = parse_filter_list(bytes);
    }

    #[test]
    fn prop_reparse_as_list_is_identity(s in "[a-z=, \\[\\]\"']{0,40}") {
        let first = parse_filter_list(s.as_str());
        prop_assert_eq!(parse_filter_list(first.clone()), first);
    }

    #[test]
    fn prop_json_lists_round_trip(tags in prop::collection::vec("[a-z]{1,8}=[a-z_]{1,8}", 1..6)) {
        let text = serde_json::to_string(&tags).unwrap();
        let parsed = parse_filter_list_detailed(text.as_str());
        prop_assert_eq!(parsed.confidence, ParseConfidence::Structured);
        prop_assert_eq!(parsed.tags, tags);
    }
}
