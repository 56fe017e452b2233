//! The individual stages of the filter-list parsing cascade.
//!
//! Each stage looks at the current text and either produces a list, declines,
//! or hands a rewritten text to the stages after it.

use super::types::ParseConfidence;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Mapping fields searched for the payload, in priority order.
pub(crate) const CANDIDATE_FIELDS: [&str; 5] = ["response", "result", "data", "choices", "output"];

static BRACKETED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Matched(Vec<String>),
    NoMatch,
    /// Continue the cascade with this text instead of the current one.
    Rewrite(String),
}

pub trait ParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn confidence(&self) -> ParseConfidence;
    fn attempt(&self, text: &str) -> StrategyOutcome;
}

/// Whole input as JSON: a list, or a mapping wrapping the list (possibly as a string).
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictDecode;

/// Input that is itself a bracketed list, JSON or not.
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketBounded;

/// First `[...]` found anywhere inside surrounding noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedBracket;

/// Comma split of the whole text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastResortSplit;

/// The cascade, in the order it is tried.
pub static STRATEGIES: [&dyn ParseStrategy; 4] =
    [&StrictDecode, &BracketBounded, &EmbeddedBracket, &LastResortSplit];

impl ParseStrategy for StrictDecode {
    fn name(&self) -> &'static str {
        "strict_decode"
    }

    fn confidence(&self) -> ParseConfidence {
        ParseConfidence::Structured
    }

    fn attempt(&self, text: &str) -> StrategyOutcome {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => StrategyOutcome::Matched(normalize_list(&items)),
            Ok(Value::Object(map)) => match mapping_candidate(&map) {
                None => StrategyOutcome::Matched(Vec::new()),
                Some(Value::Array(items)) => StrategyOutcome::Matched(normalize_list(items)),
                Some(Value::String(s)) => {
                    let inner = strip_wrapping(s);
                    match self.attempt(inner) {
                        StrategyOutcome::Matched(tags) => StrategyOutcome::Matched(tags),
                        StrategyOutcome::Rewrite(deeper) => StrategyOutcome::Rewrite(deeper),
                        StrategyOutcome::NoMatch => StrategyOutcome::Rewrite(inner.to_string()),
                    }
                }
                Some(_) => StrategyOutcome::NoMatch,
            },
            _ => StrategyOutcome::NoMatch,
        }
    }
}

impl ParseStrategy for BracketBounded {
    fn name(&self) -> &'static str {
        "bracket_bounded"
    }

    fn confidence(&self) -> ParseConfidence {
        ParseConfidence::Structured
    }

    fn attempt(&self, text: &str) -> StrategyOutcome {
        let stripped = strip_wrapping(text);
        if stripped.starts_with('[') && stripped.ends_with(']') {
            StrategyOutcome::Matched(decode_or_split(stripped))
        } else {
            StrategyOutcome::NoMatch
        }
    }
}

impl ParseStrategy for EmbeddedBracket {
    fn name(&self) -> &'static str {
        "embedded_bracket"
    }

    fn confidence(&self) -> ParseConfidence {
        ParseConfidence::Structured
    }

    fn attempt(&self, text: &str) -> StrategyOutcome {
        match BRACKETED.as_ref().and_then(|re| re.find(text)) {
            Some(m) => StrategyOutcome::Matched(decode_or_split(m.as_str())),
            None => StrategyOutcome::NoMatch,
        }
    }
}

impl ParseStrategy for LastResortSplit {
    fn name(&self) -> &'static str {
        "last_resort_split"
    }

    fn confidence(&self) -> ParseConfidence {
        ParseConfidence::Fallback
    }

    fn attempt(&self, text: &str) -> StrategyOutcome {
        let tags = split_unquoted(text)
            .into_iter()
            .map(|token| {
                let unbracketed = strip_one_quote_layer(token.trim())
                    .trim_matches(|c: char| matches!(c, '[' | ']' | '{' | '}') || c.is_whitespace());
                strip_one_quote_layer(unbracketed).trim().to_string()
            })
            .filter(|t| !t.is_empty())
            .collect();
        StrategyOutcome::Matched(tags)
    }
}

/// Priority fields first (non-null), then the first string or list value.
fn mapping_candidate(map: &Map<String, Value>) -> Option<&Value> {
    CANDIDATE_FIELDS
        .iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
        .or_else(|| map.values().find(|v| v.is_string() || v.is_array()))
}

// `bracketed` starts with '[' and ends with ']'.
fn decode_or_split(bracketed: &str) -> Vec<String> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(bracketed) {
        return normalize_list(&items);
    }
    let inner = bracketed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or_default();
    split_unquoted(inner)
        .into_iter()
        .map(|token| strip_one_quote_layer(token.trim()).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// String form of each element, trimmed; nulls dropped.
pub(crate) fn normalize_list(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string().trim().to_string(),
        })
        .collect()
}

/// Trims, then removes one layer of matching `"` or `'` around the whole text.
pub(crate) fn strip_wrapping(s: &str) -> &str {
    strip_one_quote_layer(s.trim()).trim()
}

// A lone quote counts as wrapping nothing.
fn strip_one_quote_layer(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.starts_with(q) && s.ends_with(q) {
            return s.get(1..s.len() - 1).unwrap_or_default();
        }
    }
    s
}

/// Splits on commas with an even number of `"` on both sides.
pub(crate) fn split_unquoted(text: &str) -> Vec<&str> {
    let total = text.matches('"').count();
    let mut seen = 0usize;
    let mut start = 0usize;
    let mut parts = Vec::new();
    for (i, c) in text.char_indices() {
        match c {
            '"' => seen += 1,
            ',' if seen % 2 == 0 && (total - seen) % 2 == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
