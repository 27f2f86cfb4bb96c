//! Prometheus metrics for the HTTP surface

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Start the Prometheus exporter on `0.0.0.0:{port}/metrics`.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Request counters and latency histogram for one server.
///
/// Emitted series:
/// * `http_requests_total{server,method,status}`
/// * `http_request_duration_seconds{server,method}`
///
/// Without an installed recorder every call is a no-op.
#[derive(Clone, Debug)]
pub struct ServerMetrics {
    server_name: String,
}

impl ServerMetrics {
    pub fn new(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
        }
    }

    /// Record a completed request
    pub fn record_request(&self, method: &str, status_code: u16, duration: Duration) {
        counter!(
            "http_requests_total",
            "server" => self.server_name.clone(),
            "method" => method.to_string(),
            "status" => status_code.to_string()
        )
        .increment(1);
        histogram!(
            "http_request_duration_seconds",
            "server" => self.server_name.clone(),
            "method" => method.to_string()
        )
        .record(duration.as_secs_f64());
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Records the request when dropped.
///
/// ```ignore
/// let mut guard = RequestMetricsGuard::new(&metrics, "GET");
/// let response = next.run(request).await;
/// guard.set_status(response.status().as_u16());
/// ```
pub struct RequestMetricsGuard<'a> {
    metrics: &'a ServerMetrics,
    method: String,
    start: Instant,
    status_code: u16,
}

impl<'a> RequestMetricsGuard<'a> {
    pub fn new(metrics: &'a ServerMetrics, method: impl Into<String>) -> Self {
        Self {
            metrics,
            method: method.into(),
            start: Instant::now(),
            // Overwritten once the handler returns; a dropped future counts as a server error.
            status_code: 500,
        }
    }

    pub fn set_status(&mut self, code: u16) {
        self.status_code = code;
    }
}

impl Drop for RequestMetricsGuard<'_> {
    fn drop(&mut self) {
        self.metrics
            .record_request(&self.method, self.status_code, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = ServerMetrics::new("laser-http");
        assert_eq!(metrics.server_name(), "laser-http");

        let mut guard = RequestMetricsGuard::new(&metrics, "GET");
        guard.set_status(200);
        drop(guard);
    }
}
