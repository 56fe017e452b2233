use super::types::{CompiledQuery, QueryKind};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const AUDIT_TARGET: &str = "areaquery::audit";
pub const METRICS_TARGET: &str = "areaquery::metrics";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub enable_audit: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let audit = std::env::var("AREAQUERY_AUDIT")
            .map(|s| !matches!(s.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);
        Self { enable_audit: audit }
    }
}

#[derive(Default)]
pub struct Metrics {
    pub queries_compiled_total: AtomicU64,
    pub alternation_queries_total: AtomicU64,
    pub searches_total: AtomicU64,
    pub degraded_searches_total: AtomicU64,
    pub parse_fallbacks_total: AtomicU64,
    pub collaborator_failures_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub queries_compiled: u64,
    pub alternation_queries: u64,
    pub searches: u64,
    pub degraded_searches: u64,
    pub parse_fallbacks: u64,
    pub collaborator_failures: u64,
}

#[derive(Default)]
pub struct Telemetry {
    pub cfg: RwLock<TelemetryConfig>,
    pub metrics: Metrics,
    // For tests we can capture audit lines in-memory
    audit_sink: RwLock<Option<Arc<RwLock<Vec<String>>>>>,
}

pub(crate) static TELEMETRY: std::sync::LazyLock<Telemetry> =
    std::sync::LazyLock::new(Telemetry::default);

pub fn set_audit_enabled(enabled: bool) {
    TELEMETRY.cfg.write().enable_audit = enabled;
}
pub fn set_audit_sink_for_tests(sink: Arc<RwLock<Vec<String>>>) {
    *TELEMETRY.audit_sink.write() = Some(sink);
}

fn now_ts() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn emit_audit(line: String) {
    let sink = TELEMETRY.audit_sink.read().clone();
    if let Some(sink) = sink {
        sink.write().push(line.clone());
    }
    log::info!(target: AUDIT_TARGET, "{line}");
}

pub fn record_compiled(query: &CompiledQuery) {
    TELEMETRY.metrics.queries_compiled_total.fetch_add(1, Ordering::Relaxed);
    if query.kind() == QueryKind::Alternation {
        TELEMETRY.metrics.alternation_queries_total.fetch_add(1, Ordering::Relaxed);
    }
    if !TELEMETRY.cfg.read().enable_audit {
        return;
    }
    let kind = match query.kind() {
        QueryKind::Equality => "equality",
        QueryKind::Alternation => "alternation",
    };
    let line = serde_json::json!({
        "ts": now_ts(),
        "event": "query_compiled",
        "kind": kind,
        "key": query.key(),
        "values": query.values().len(),
        "timeout_secs": query.timeout_secs(),
        "bytes": query.as_str().len(),
    })
    .to_string();
    emit_audit(line);
}

/// The classifier text only parsed through the last-resort split.
pub fn record_parse_fallback(text: &str, tokens: usize) {
    TELEMETRY.metrics.parse_fallbacks_total.fetch_add(1, Ordering::Relaxed);
    log::warn!(
        target: METRICS_TARGET,
        "filter list parsed by last-resort split: tokens={tokens} input_len={}",
        text.len()
    );
}

pub fn record_collaborator_failure(collaborator: &str, error: &str) {
    TELEMETRY.metrics.collaborator_failures_total.fetch_add(1, Ordering::Relaxed);
    log::warn!(target: METRICS_TARGET, "collaborator={collaborator} unavailable: {error}");
}

pub fn record_search(elements: usize, degraded: Option<&str>) {
    TELEMETRY.metrics.searches_total.fetch_add(1, Ordering::Relaxed);
    if let Some(reason) = degraded {
        TELEMETRY.metrics.degraded_searches_total.fetch_add(1, Ordering::Relaxed);
        log::warn!(target: METRICS_TARGET, "search degraded: {reason}");
    } else {
        log::info!(target: METRICS_TARGET, "search returned {elements} element(s)");
    }
}

#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    let m = &TELEMETRY.metrics;
    MetricsSnapshot {
        queries_compiled: m.queries_compiled_total.load(Ordering::Relaxed),
        alternation_queries: m.alternation_queries_total.load(Ordering::Relaxed),
        searches: m.searches_total.load(Ordering::Relaxed),
        degraded_searches: m.degraded_searches_total.load(Ordering::Relaxed),
        parse_fallbacks: m.parse_fallbacks_total.load(Ordering::Relaxed),
        collaborator_failures: m.collaborator_failures_total.load(Ordering::Relaxed),
    }
}

#[must_use]
pub fn metrics_text() -> String {
    // OpenMetrics/Prometheus exposition format (no types/HELP for brevity)
    let s = snapshot();
    format!(
        "areaquery_queries_compiled_total {}\n\
         areaquery_alternation_queries_total {}\n\
         areaquery_searches_total {}\n\
         areaquery_degraded_searches_total {}\n\
         areaquery_parse_fallbacks_total {}\n\
         areaquery_collaborator_failures_total {}\n",
        s.queries_compiled,
        s.alternation_queries,
        s.searches,
        s.degraded_searches,
        s.parse_fallbacks,
        s.collaborator_failures,
    )
}
