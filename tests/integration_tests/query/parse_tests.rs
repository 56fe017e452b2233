use areaquery::query::strategy::{STRATEGIES, StrategyOutcome};
use areaquery::query::{ParseConfidence, RawInput, parse_filter_list, parse_filter_list_detailed};
use serde_json::{Value, json};

#[test]
fn mapping_response_field_holding_a_list_string() {
    let raw = r#"{"response":"[\"amenity=bar\", \"amenity=cafe\"]"}"#;
    assert_eq!(parse_filter_list(raw), vec!["amenity=bar", "amenity=cafe"]);
}

#[test]
fn double_and_single_quoted_lists() {
    assert_eq!(parse_filter_list(r#"["amenity=bar","amenity=cafe"]"#), vec!["amenity=bar", "amenity=cafe"]);
    assert_eq!(parse_filter_list("['amenity=bar','amenity=cafe']"), vec!["amenity=bar", "amenity=cafe"]);
}

#[test]
fn plain_prose_never_fails() {
    let parsed = parse_filter_list_detailed("no structured content here");
    assert_eq!(parsed.tags, vec!["no structured content here"]);
    assert_eq!(parsed.confidence, ParseConfidence::Fallback);
    assert!(parsed.is_fallback());
}

#[test]
fn list_embedded_in_prose_is_found() {
    let parsed = parse_filter_list_detailed("Sure! Here you go: [\"amenity=pub\", \"amenity=bar\"] enjoy.");
    assert_eq!(parsed.tags, vec!["amenity=pub", "amenity=bar"]);
    assert_eq!(parsed.confidence, ParseConfidence::Structured);
}

#[test]
fn quoted_commas_do_not_split() {
    let parsed = parse_filter_list(r#"["name=Fish, Chips", amenity=cafe]"#);
    assert_eq!(parsed, vec!["name=Fish, Chips", "amenity=cafe"]);
}

#[test]
fn empty_and_missing_inputs() {
    assert!(parse_filter_list(Vec::<Value>::new()).is_empty());
    assert!(parse_filter_list(RawInput::Missing).is_empty());
    assert!(parse_filter_list(None::<String>).is_empty());
    assert!(parse_filter_list(Value::Null).is_empty());
    assert!(parse_filter_list("   ").is_empty());
    assert_eq!(parse_filter_list_detailed("").confidence, ParseConfidence::Empty);
}

#[test]
fn structured_lists_are_normalized_and_stable() {
    let out = parse_filter_list(vec![json!(" amenity=cafe "), Value::Null, json!(3)]);
    assert_eq!(out, vec!["amenity=cafe", "3"]);
    assert_eq!(parse_filter_list(out.clone()), out);
}

#[test]
fn bytes_are_decoded() {
    assert_eq!(parse_filter_list(b"[\"amenity=cafe\"]".as_slice()), vec!["amenity=cafe"]);
    assert!(!parse_filter_list(vec![0xff_u8, b'a', b'b']).is_empty());
}

#[test]
fn strategies_run_in_declared_order() {
    let names: Vec<&str> = STRATEGIES.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["strict_decode", "bracket_bounded", "embedded_bracket", "last_resort_split"]);
    assert_eq!(STRATEGIES[3].confidence(), ParseConfidence::Fallback);
    assert!(matches!(STRATEGIES[0].attempt("not json"), StrategyOutcome::NoMatch));
}
