//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, status, upstream
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//! - `relay_retries_total` (counter): upstream attempts beyond the first
//!
//! # Design Decisions
//! - The `metrics` facade is always recorded into; without an installed
//!   recorder the macros are no-ops, so library users pay nothing
//! - The Prometheus exporter is only started by the daemon, from config

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

/// Record one completed (or failed) relayed request.
pub fn record_request(method: &str, status: u16, upstream: &str, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "upstream" => upstream.to_string()
    )
    .increment(1);
    histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one retry of an upstream attempt.
pub fn record_retry(upstream: &str) {
    counter!(
        "relay_retries_total",
        "upstream" => upstream.to_string()
    )
    .increment(1);
}
