//! Prometheus metrics for the worker: job counters and durations.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

pub mod names {
    pub const JOBS_ACCEPTED_TOTAL: &str = "vsub_worker_jobs_accepted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "vsub_worker_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vsub_worker_jobs_failed_total";
    pub const JOB_DURATION_SECONDS: &str = "vsub_worker_job_duration_seconds";
    pub const WEBHOOK_DELIVERY_FAILURES_TOTAL: &str = "vsub_worker_webhook_delivery_failures_total";
}

/// Record a job accepted for background execution.
pub fn record_job_accepted(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::JOBS_ACCEPTED_TOTAL, &labels).increment(1);
}

/// Record a finished job run and its wall-clock duration.
pub fn record_job_finished(job_type: &str, success: bool, duration_secs: f64) {
    let labels = [("type", job_type.to_string())];
    if success {
        counter!(names::JOBS_COMPLETED_TOTAL, &labels).increment(1);
    } else {
        counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
    }
    histogram!(names::JOB_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a webhook that could not be delivered.
pub fn record_webhook_failure(job_type: &str) {
    let labels = [("type", job_type.to_string())];
    counter!(names::WEBHOOK_DELIVERY_FAILURES_TOTAL, &labels).increment(1);
}
