use super::telemetry;
use super::types::{CompiledQuery, FilterTag, QueryKind};
use crate::errors::AreaQueryError;
use crate::types::Ring;

/// Entity kinds requested from the geodata service.
const ENTITY_KINDS: [&str; 3] = ["node", "way", "relation"];

/// Compiles a polygon-restricted query matching any of `filters`.
///
/// One filter becomes a literal equality test; several are merged into a single
/// anchored alternation against their shared key. Open rings are closed before
/// serialization. Duplicate values are matched once.
///
/// # Errors
/// `InvalidGeometry` for an empty ring; `InvalidFilterSet` when `filters` is
/// empty, has a blank key or value, or spans more than one key.
pub fn compile_query(
    ring: &Ring,
    filters: &[FilterTag],
    timeout_secs: u32,
) -> Result<CompiledQuery, AreaQueryError> {
    if ring.is_empty() {
        return Err(AreaQueryError::InvalidGeometry("ring has no coordinates".into()));
    }
    let Some(first) = filters.first() else {
        return Err(AreaQueryError::InvalidFilterSet("no filters given".into()));
    };
    if let Some(bad) = filters.iter().find(|f| f.key.trim().is_empty() || f.value.trim().is_empty()) {
        return Err(AreaQueryError::InvalidFilterSet(format!(
            "filter '{}={}' needs both a key and a value",
            bad.key, bad.value
        )));
    }
    let key = first.key.as_str();
    if let Some(other) = filters.iter().find(|f| f.key != key) {
        return Err(AreaQueryError::InvalidFilterSet(format!(
            "filters span several keys ('{key}' and '{}')",
            other.key
        )));
    }
    let mut values: Vec<String> = Vec::with_capacity(filters.len());
    for f in filters {
        if !values.contains(&f.value) {
            values.push(f.value.clone());
        }
    }

    let (kind, clause) = if let [only] = values.as_slice() {
        (QueryKind::Equality, format!("[\"{}\"=\"{}\"]", ql_escape(key), ql_escape(only)))
    } else {
        (QueryKind::Alternation, format!("[\"{}\"~\"{}\"]", ql_escape(key), ql_escape(&alternation(&values))))
    };
    let poly = poly_string(ring);

    let mut lines = Vec::with_capacity(ENTITY_KINDS.len() + 4);
    lines.push(format!("[out:json][timeout:{timeout_secs}];"));
    lines.push("(".to_string());
    for entity in ENTITY_KINDS {
        lines.push(format!("  {entity}{clause}(poly:\"{poly}\");"));
    }
    lines.push(");".to_string());
    lines.push("out center;".to_string());

    let compiled = CompiledQuery::new(lines.join("\n"), kind, key.to_string(), values, timeout_secs);
    telemetry::record_compiled(&compiled);
    Ok(compiled)
}

/// Single-filter form of [`compile_query`].
///
/// # Errors
/// Same as [`compile_query`].
pub fn compile_query_single(
    ring: &Ring,
    key: &str,
    value: &str,
    timeout_secs: u32,
) -> Result<CompiledQuery, AreaQueryError> {
    compile_query(ring, &[FilterTag::new(key, value)], timeout_secs)
}

/// `"lat lon lat lon ..."` over the closed ring.
#[must_use]
pub fn poly_string(ring: &Ring) -> String {
    ring.closed().points().iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// `^(v1|v2|...)$` with each value pattern-escaped.
fn alternation(values: &[String]) -> String {
    let escaped: Vec<String> = values.iter().map(|v| regex::escape(v)).collect();
    format!("^({})$", escaped.join("|"))
}

/// Escapes a value for a double-quoted string literal in the query language.
fn ql_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
