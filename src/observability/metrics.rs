//! Metrics collection and exposition.
//!
//! # Metrics
//! - `log_relay_enqueued_total` (counter): entries accepted, by severity
//! - `log_relay_dropped_total` (counter): entries rejected by `try_enqueue`
//! - `log_relay_delivered_total` (counter): entries delivered by the sink
//! - `log_relay_delivery_failures_total` (counter): failed deliveries, by reason

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::codec::Severity;

/// Install the Prometheus exporter. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_enqueued(severity: Severity) {
    counter!("log_relay_enqueued_total", "severity" => severity.as_str()).increment(1);
}

pub fn record_dropped(severity: Severity) {
    counter!("log_relay_dropped_total", "severity" => severity.as_str()).increment(1);
}

pub fn record_delivered() {
    counter!("log_relay_delivered_total").increment(1);
}

pub fn record_delivery_failure(reason: &'static str) {
    counter!("log_relay_delivery_failures_total", "reason" => reason).increment(1);
}
