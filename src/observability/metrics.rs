//! Metrics collection and exposition.
//!
//! # Metrics
//! - `country_ws_requests_total` (counter): SOAP requests by operation, status
//! - `country_ws_request_duration_seconds` (histogram): handler latency
//! - `country_ws_lookups_total` (counter): repository lookups by result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a handled SOAP request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "country_ws_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("country_ws_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a repository lookup.
pub fn record_lookup(found: bool) {
    let result = if found { "found" } else { "missing" };
    metrics::counter!("country_ws_lookups_total", "result" => result).increment(1);
}
