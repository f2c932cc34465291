//! Webhook delivery back to the orchestrator.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{WorkerError, WorkerResult};

/// Default ceiling on one delivery attempt.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers job-completion webhooks.
///
/// One attempt per webhook, no retry queue: the orchestrator treats every
/// webhook as idempotent and a lost delivery surfaces as a stuck status the
/// client's poll timeout catches.
pub struct WebhookNotifier {
    http: Client,
}

impl WebhookNotifier {
    pub fn new() -> WorkerResult<Self> {
        // Per-request timeouts only; filmstrip deliveries scale theirs with
        // the source duration.
        let http = Client::builder().build()?;
        Ok(Self { http })
    }

    /// POST `payload` to `url` with the default timeout.
    pub async fn deliver<P: Serialize>(&self, url: &str, payload: &P) -> WorkerResult<()> {
        self.deliver_with_timeout(url, payload, WEBHOOK_TIMEOUT).await
    }

    /// POST `payload` to `url`, failing the attempt after `timeout`.
    pub async fn deliver_with_timeout<P: Serialize>(
        &self,
        url: &str,
        payload: &P,
        timeout: Duration,
    ) -> WorkerResult<()> {
        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| WorkerError::WebhookDelivery(format!("{url}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!(url, %status, "Webhook delivered");
            Ok(())
        } else {
            warn!(url, %status, "Webhook rejected");
            Err(WorkerError::WebhookDelivery(format!(
                "{url} returned {status}"
            )))
        }
    }
}

/// Delivery timeout for payloads that embed frame data, scaled with the
/// source duration: duration/10 + 30s, clamped to [30s, 120s].
pub fn adaptive_timeout(duration_seconds: f64) -> Duration {
    let secs = (duration_seconds / 10.0 + 30.0).clamp(30.0, 120.0);
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_timeout_floor() {
        assert_eq!(adaptive_timeout(0.0), Duration::from_secs(30));
    }

    #[test]
    fn test_adaptive_timeout_scales_with_duration() {
        assert_eq!(adaptive_timeout(300.0), Duration::from_secs(60));
    }

    #[test]
    fn test_adaptive_timeout_ceiling() {
        assert_eq!(adaptive_timeout(10_000.0), Duration::from_secs(120));
    }
}
