//! Prometheus metrics for the orchestrator.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vsub_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vsub_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vsub_http_requests_in_flight";

    // Dispatch metrics
    pub const DISPATCHES_TOTAL: &str = "vsub_dispatches_total";
    pub const DISPATCH_FAILURES_TOTAL: &str = "vsub_dispatch_failures_total";

    // Webhook metrics
    pub const WEBHOOKS_RECEIVED_TOTAL: &str = "vsub_webhooks_received_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "vsub_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vsub_jobs_failed_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a job dispatched to the worker.
pub fn record_dispatch(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::DISPATCHES_TOTAL, &labels).increment(1);
}

/// Record a dispatch call that never reached or was rejected by the worker.
pub fn record_dispatch_failure(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::DISPATCH_FAILURES_TOTAL, &labels).increment(1);
}

/// Record an inbound webhook.
pub fn record_webhook(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::WEBHOOKS_RECEIVED_TOTAL, &labels).increment(1);
}

/// Record a job reported completed.
pub fn record_job_completed(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::JOBS_COMPLETED_TOTAL, &labels).increment(1);
}

/// Record a job reported failed.
pub fn record_job_failed(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels: the segment after `/videos/` is an id.
fn sanitize_path(path: &str) -> String {
    let mut segments: Vec<String> = path.split('/').map(str::to_string).collect();
    for i in 0..segments.len() {
        if segments[i] == "videos" && i + 1 < segments.len() && !segments[i + 1].is_empty() {
            segments[i + 1] = ":video_id".to_string();
        }
    }
    segments.join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/videos/550e8400-e29b-41d4-a716-446655440000/render"),
            "/api/videos/:video_id/render"
        );
        assert_eq!(sanitize_path("/api/videos/abc123"), "/api/videos/:video_id");
        assert_eq!(sanitize_path("/api/videos"), "/api/videos");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
