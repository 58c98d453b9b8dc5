//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ipgate_messages_total` (counter): handled chat messages by result
//! - `ipgate_rules_added_total` (counter): addresses written to the Caddyfile
//! - `ipgate_reloads_total` (counter): reload attempts by result
//! - `ipgate_reload_duration_seconds` (histogram): runtime API round trips
//!
//! # Design Decisions
//! - Recording is always safe; without an installed exporter it is a no-op
//! - Exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a handled chat message by outcome label.
pub fn record_message(result: &'static str) {
    metrics::counter!("ipgate_messages_total", "result" => result).increment(1);
}

pub fn record_rule_added() {
    metrics::counter!("ipgate_rules_added_total").increment(1);
}

/// Record one reload attempt and its duration.
pub fn record_reload(success: bool, start: Instant) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("ipgate_reloads_total", "result" => result).increment(1);
    metrics::histogram!("ipgate_reload_duration_seconds").record(start.elapsed().as_secs_f64());
}
