use super::strategy::{STRATEGIES, StrategyOutcome, normalize_list};
use super::telemetry;
use super::types::{ParseConfidence, ParsedFilters, RawInput};

/// Parses classifier output into a list of filter strings. Never fails.
///
/// See [`parse_filter_list_detailed`] for the confidence of the result.
pub fn parse_filter_list(raw: impl Into<RawInput>) -> Vec<String> {
    parse_filter_list_detailed(raw).tags
}

/// Runs the parsing cascade and reports which stage produced the list.
///
/// A structured list is returned as-is (trimmed, nulls dropped). Text and bytes
/// go through strict JSON decoding, a bracketed-list decode, a search for an
/// embedded `[...]`, and finally a plain comma split. Results from the last
/// stage are tagged [`ParseConfidence::Fallback`].
pub fn parse_filter_list_detailed(raw: impl Into<RawInput>) -> ParsedFilters {
    let mut text = match raw.into() {
        RawInput::Missing => return ParsedFilters::empty("missing"),
        RawInput::List(items) => return finish(normalize_list(&items), ParseConfidence::Structured, "list"),
        RawInput::Text(s) => s,
        RawInput::Bytes(bytes) => String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
    };
    text = text.trim().to_string();

    for strategy in &STRATEGIES {
        match strategy.attempt(&text) {
            StrategyOutcome::Matched(tags) => {
                let parsed = finish(tags, strategy.confidence(), strategy.name());
                if parsed.is_fallback() {
                    telemetry::record_parse_fallback(&text, parsed.tags.len());
                }
                return parsed;
            }
            StrategyOutcome::Rewrite(inner) => {
                log::debug!("{} rewrote classifier text for later stages", strategy.name());
                text = inner;
            }
            StrategyOutcome::NoMatch => {}
        }
    }
    ParsedFilters::empty("exhausted")
}

fn finish(tags: Vec<String>, confidence: ParseConfidence, strategy: &'static str) -> ParsedFilters {
    if tags.is_empty() {
        return ParsedFilters::empty(strategy);
    }
    ParsedFilters { tags, confidence, strategy }
}
