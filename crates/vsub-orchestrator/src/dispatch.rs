//! Worker dispatch client.
//!
//! Dispatch is fire-and-forget: the worker acknowledges immediately and
//! reports the outcome later through a webhook. A failed dispatch call is
//! final — the caller flips the record to `failed` and waits for the user,
//! never retrying on its own.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use vsub_models::{DispatchAck, JobKind, JobRequest};

use crate::metrics;

/// Ceiling on the dispatch HTTP call itself. The worker answers before it
/// starts the job, so anything slower than this is a dead worker.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("worker unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("worker rejected {kind} job with {status}: {body}")]
    Rejected {
        kind: JobKind,
        status: u16,
        body: String,
    },
}

/// HTTP client for the worker's job-accept endpoints.
pub struct WorkerClient {
    http: Client,
    worker_url: String,
    worker_secret: String,
    public_base_url: String,
}

impl WorkerClient {
    pub fn new(
        worker_url: impl Into<String>,
        worker_secret: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        let http = Client::builder().timeout(DISPATCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            worker_url: worker_url.into(),
            worker_secret: worker_secret.into(),
            public_base_url: public_base_url.into(),
        })
    }

    /// Callback address the worker reports back to for a job type.
    pub fn webhook_url(&self, kind: JobKind) -> String {
        format!(
            "{}/api/webhooks/{}",
            self.public_base_url,
            kind.webhook_suffix()
        )
    }

    /// Send a job to the worker and return its acknowledgement.
    pub async fn dispatch(&self, job: &JobRequest) -> Result<DispatchAck, DispatchError> {
        let kind = job.kind();
        let url = format!("{}{}", self.worker_url, kind.worker_path());

        debug!(video_id = %job.video_id(), job_type = %kind, "Dispatching job to {}", url);
        metrics::record_dispatch(kind.as_str());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.worker_secret)
            .json(&job.to_body())
            .send()
            .await
            .inspect_err(|_| metrics::record_dispatch_failure(kind.as_str()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(job_type = %kind, status, "Worker rejected dispatch: {}", body);
            metrics::record_dispatch_failure(kind.as_str());
            return Err(DispatchError::Rejected { kind, status, body });
        }

        let ack: DispatchAck = response.json().await?;
        Ok(ack)
    }

    /// Check if the worker is reachable and healthy.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.worker_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Worker health check error: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url_per_job_type() {
        let client =
            WorkerClient::new("http://worker:8000", "secret", "http://localhost:3000").unwrap();
        assert_eq!(
            client.webhook_url(JobKind::Transcription),
            "http://localhost:3000/api/webhooks/transcription"
        );
        assert_eq!(
            client.webhook_url(JobKind::Filmstrip),
            "http://localhost:3000/api/webhooks/filmstrip"
        );
    }
}
