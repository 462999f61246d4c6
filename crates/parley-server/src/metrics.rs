//! Metrics collection and export for Parley.
//!
//! Uses the `metrics` crate for instrumentation and exports
//! to Prometheus format.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use parley_core::{CoordinatorStats, Fanout, Moderation};
use std::net::SocketAddr;
use tracing::info;

/// Metric names.
pub mod names {
    pub const CONNECTIONS_TOTAL: &str = "parley_connections_total";
    pub const CONNECTIONS_ACTIVE: &str = "parley_connections_active";
    pub const SESSIONS_ACTIVE: &str = "parley_sessions_active";
    pub const CHANNELS_ACTIVE: &str = "parley_channels_active";
    pub const EVENTS_TOTAL: &str = "parley_events_total";
    pub const MODERATIONS_TOTAL: &str = "parley_moderations_total";
    pub const MESSAGES_TOTAL: &str = "parley_messages_total";
    pub const MESSAGES_BYTES: &str = "parley_messages_bytes";
    pub const DELIVERIES_TOTAL: &str = "parley_deliveries_total";
    pub const DELIVERIES_DROPPED: &str = "parley_deliveries_dropped_total";
    pub const LATENCY_SECONDS: &str = "parley_latency_seconds";
    pub const ERRORS_TOTAL: &str = "parley_errors_total";
}

/// Initialize the metrics system.
pub fn init_metrics() {
    metrics::describe_counter!(
        names::CONNECTIONS_TOTAL,
        "Total number of connections since server start"
    );
    metrics::describe_gauge!(
        names::CONNECTIONS_ACTIVE,
        "Current number of open connections"
    );
    metrics::describe_gauge!(names::SESSIONS_ACTIVE, "Current number of joined sessions");
    metrics::describe_gauge!(names::CHANNELS_ACTIVE, "Current number of channels");
    metrics::describe_counter!(names::EVENTS_TOTAL, "Session events handled, by kind");
    metrics::describe_counter!(
        names::MODERATIONS_TOTAL,
        "Moderation requests, by outcome"
    );
    metrics::describe_counter!(names::MESSAGES_TOTAL, "WebSocket messages, by direction");
    metrics::describe_counter!(names::MESSAGES_BYTES, "WebSocket bytes, by direction");
    metrics::describe_counter!(
        names::DELIVERIES_TOTAL,
        "Envelopes queued for connections"
    );
    metrics::describe_counter!(
        names::DELIVERIES_DROPPED,
        "Envelopes dropped because a connection was closed or full"
    );
    metrics::describe_histogram!(
        names::LATENCY_SECONDS,
        "Session event handling latency in seconds"
    );
    metrics::describe_counter!(names::ERRORS_TOTAL, "Total number of errors");

    info!("Metrics initialized");
}

/// Start the Prometheus metrics server.
///
/// # Errors
///
/// Returns an error if the server cannot be started.
pub fn start_metrics_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    info!("Metrics server listening on {}", addr);
    Ok(())
}

/// Record a new connection.
pub fn record_connection() {
    counter!(names::CONNECTIONS_TOTAL).increment(1);
    gauge!(names::CONNECTIONS_ACTIVE).increment(1.0);
}

/// Record a disconnection.
pub fn record_disconnection() {
    gauge!(names::CONNECTIONS_ACTIVE).decrement(1.0);
}

/// Record a handled session event.
pub fn record_event(kind: &'static str) {
    counter!(names::EVENTS_TOTAL, "kind" => kind).increment(1);
}

/// Record the outcome of a moderation request.
pub fn record_moderation(moderation: &Moderation) {
    counter!(names::MODERATIONS_TOTAL, "outcome" => moderation.outcome()).increment(1);
}

/// Record a WebSocket message.
pub fn record_message(bytes: usize, direction: &'static str) {
    counter!(names::MESSAGES_TOTAL, "direction" => direction).increment(1);
    counter!(names::MESSAGES_BYTES, "direction" => direction).increment(bytes as u64);
}

/// Record the outcome of a fan-out.
pub fn record_fanout(fanout: Fanout) {
    counter!(names::DELIVERIES_TOTAL).increment(fanout.delivered as u64);
    if fanout.dropped > 0 {
        counter!(names::DELIVERIES_DROPPED).increment(fanout.dropped as u64);
    }
}

/// Record event handling latency.
pub fn record_latency(seconds: f64) {
    histogram!(names::LATENCY_SECONDS).record(seconds);
}

/// Update session and channel gauges.
pub fn set_coordinator_stats(stats: CoordinatorStats) {
    gauge!(names::SESSIONS_ACTIVE).set(stats.sessions as f64);
    gauge!(names::CHANNELS_ACTIVE).set(stats.channels as f64);
}

/// Record an error.
pub fn record_error(error_type: &'static str) {
    counter!(names::ERRORS_TOTAL, "type" => error_type).increment(1);
}

/// Metrics guard that records disconnection on drop.
pub struct ConnectionMetricsGuard;

impl ConnectionMetricsGuard {
    /// Create a new metrics guard, recording a connection.
    #[must_use]
    pub fn new() -> Self {
        record_connection();
        Self
    }
}

impl Default for ConnectionMetricsGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConnectionMetricsGuard {
    fn drop(&mut self) {
        record_disconnection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: every call is a no-op
        let _guard = ConnectionMetricsGuard::new();
        record_event("join");
        record_moderation(&Moderation::Denied);
        record_fanout(Fanout {
            delivered: 3,
            dropped: 1,
        });
        set_coordinator_stats(CoordinatorStats {
            connections: 1,
            sessions: 1,
            channels: 1,
        });
    }
}
