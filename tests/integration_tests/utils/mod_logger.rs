use areaquery::logger::configure_logging;
use areaquery::query::telemetry::{AUDIT_TARGET, METRICS_TARGET};
use tempfile::tempdir;

#[test]
fn configure_logging_writes_app_audit_metrics_in_dir() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("proc_logs");
    configure_logging(Some(&base), Some("debug"), Some(3)).unwrap();
    log::info!("hello app");
    log::info!(target: AUDIT_TARGET, "audit event");
    log::info!(target: METRICS_TARGET, "metric event");
    assert!(base.join("app.log").exists());
    assert!(base.join("audit.log").exists());
    assert!(base.join("metrics.log").exists());

    // A second call swaps the active config instead of failing.
    let other = dir.path().join("second_logs");
    configure_logging(Some(&other), Some("trace"), Some(2)).unwrap();
    assert!(other.join("app.log").exists());
}
