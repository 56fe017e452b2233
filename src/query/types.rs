use crate::errors::AreaQueryError;
use crate::types::DEFAULT_CATEGORY_KEY;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A `key=value` categorical filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterTag {
    pub key: String,
    pub value: String,
}

impl FilterTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Splits at the first `=`. A tag without `=` is a bare value for `default_key`.
    ///
    /// # Errors
    /// Returns `InvalidFilterSet` when the key or value is empty after trimming.
    pub fn parse(raw: &str, default_key: &str) -> Result<Self, AreaQueryError> {
        let raw = raw.trim();
        let (key, value) = match raw.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (default_key, raw),
        };
        if key.is_empty() || value.is_empty() {
            return Err(AreaQueryError::InvalidFilterSet(format!("malformed filter tag '{raw}'")));
        }
        Ok(Self::new(key, value))
    }
}

impl FromStr for FilterTag {
    type Err = AreaQueryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_CATEGORY_KEY)
    }
}

impl fmt::Display for FilterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// How the category clause matches values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// One value, literal string equality.
    Equality,
    /// Several values merged into one anchored alternation pattern.
    Alternation,
}

/// Finished query text plus what went into it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    text: String,
    kind: QueryKind,
    key: String,
    values: Vec<String>,
    timeout_secs: u32,
}

impl CompiledQuery {
    pub(crate) const fn new(
        text: String,
        kind: QueryKind,
        key: String,
        values: Vec<String>,
        timeout_secs: u32,
    ) -> Self {
        Self { text, kind, key, values, timeout_secs }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        self.kind
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub const fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }
}

impl AsRef<str> for CompiledQuery {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Classifier output in whatever shape it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Missing,
    List(Vec<Value>),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for RawInput {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<&[u8]> for RawInput {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for RawInput {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for RawInput {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<String>> for RawInput {
    fn from(items: Vec<String>) -> Self {
        Self::List(items.into_iter().map(Value::String).collect())
    }
}

impl From<Value> for RawInput {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Self::Missing,
            Value::Array(items) => Self::List(items),
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl<T: Into<Self>> From<Option<T>> for RawInput {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

/// How much to trust a parsed filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseConfidence {
    /// A structured list was found (direct list, JSON, bracketed list).
    Structured,
    /// Only the last-resort comma split produced tokens.
    Fallback,
    /// Nothing usable.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFilters {
    pub tags: Vec<String>,
    pub confidence: ParseConfidence,
    /// Name of the stage that produced `tags`.
    pub strategy: &'static str,
}

impl ParsedFilters {
    #[must_use]
    pub const fn empty(strategy: &'static str) -> Self {
        Self { tags: Vec::new(), confidence: ParseConfidence::Empty, strategy }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.confidence == ParseConfidence::Fallback
    }
}
