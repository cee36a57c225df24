//! Metrics collection and Prometheus export.
//!
//! HTTP request metrics come from the shared middleware; this module adds
//! upstream call metrics and renders everything for `/metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one call to an upstream provider.
pub fn record_upstream_call(provider: &'static str, operation: &'static str, elapsed: Duration, ok: bool) {
    let outcome = if ok { "success" } else { "error" };

    counter!(
        "upstream_requests_total",
        "provider" => provider,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "upstream_request_duration_seconds",
        "provider" => provider,
        "operation" => operation
    )
    .record(elapsed.as_secs_f64());
}
