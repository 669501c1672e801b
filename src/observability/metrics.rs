//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webhost_lifecycle_events_total` (counter): lifecycle transitions by
//!   `event` (started, startup_failed, stop_requested, stopped, disposed)
//!
//! # Design Decisions
//! - Without an installed recorder every update is a no-op
//! - The Prometheus listener is optional and off by default

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime. Failures are logged, not
/// returned: a host runs fine without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

/// Count one lifecycle transition.
pub fn record_lifecycle(event: &'static str) {
    ::metrics::counter!("webhost_lifecycle_events_total", "event" => event).increment(1);
}
