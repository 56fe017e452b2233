use super::compile::compile_query;
use super::types::{CompiledQuery, FilterTag};
use crate::errors::AreaQueryError;
use crate::types::Ring;

/// Values of every `category_key=value` entry, in order. Other shapes and keys are ignored.
#[must_use]
pub fn category_values(parsed: &[String], category_key: &str) -> Vec<String> {
    parsed
        .iter()
        .filter_map(|entry| {
            let (key, value) = entry.trim().split_once('=')?;
            let value = value.trim();
            (key.trim() == category_key && !value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

/// Builds one combined query for all category filters found in `parsed`.
///
/// # Errors
/// `NoUsableFilters` when no entry has the `category_key=value` shape, so the
/// caller can fall back to a default category. Compiler errors pass through.
pub fn route_filters(
    parsed: &[String],
    ring: &Ring,
    category_key: &str,
    timeout_secs: u32,
) -> Result<CompiledQuery, AreaQueryError> {
    let values = category_values(parsed, category_key);
    if values.is_empty() {
        log::debug!("none of {} parsed entr(ies) matched '{category_key}=...'", parsed.len());
        return Err(AreaQueryError::NoUsableFilters);
    }
    let filters: Vec<FilterTag> = values.into_iter().map(|v| FilterTag::new(category_key, v)).collect();
    compile_query(ring, &filters, timeout_secs)
}
