//! Worker state.

use std::sync::Arc;

use reqwest::Client;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::transcription::TranscriptionClient;
use crate::webhook::WebhookNotifier;

/// Shared worker state.
///
/// Cloned into every spawned job task; everything inside is either `Arc`ed
/// or an internally reference-counted client.
#[derive(Clone)]
pub struct WorkerState {
    pub config: Arc<WorkerConfig>,
    /// Client for source downloads, bounded by the configured transfer
    /// timeout
    pub downloads: Client,
    pub transcriber: Arc<TranscriptionClient>,
    pub notifier: Arc<WebhookNotifier>,
}

impl WorkerState {
    pub fn new(config: WorkerConfig) -> WorkerResult<Self> {
        let downloads = Client::builder().timeout(config.download_timeout).build()?;
        let transcriber = TranscriptionClient::new(
            &config.transcription_api_url,
            &config.transcription_api_key,
            &config.transcription_language,
        )?;

        Ok(Self {
            config: Arc::new(config),
            downloads,
            transcriber: Arc::new(transcriber),
            notifier: Arc::new(WebhookNotifier::new()?),
        })
    }
}
