//! Whisper-compatible speech-to-text client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use vsub_models::SubtitleCue;

use crate::error::{WorkerError, WorkerResult};

/// Ceiling on one transcription API call. Generous: the upload alone can be
/// slow for long sources.
const TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(600);

/// Speech model identifier.
const MODEL: &str = "whisper-1";

/// Client for a hosted Whisper-compatible transcription API.
pub struct TranscriptionClient {
    http: Client,
    api_url: String,
    api_key: String,
    default_language: String,
}

/// Verbose-JSON response shape: only the segment timeline is consumed.
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionSegment {
    start: f64,
    end: f64,
    text: String,
}

impl TranscriptionClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        default_language: impl Into<String>,
    ) -> WorkerResult<Self> {
        let http = Client::builder().timeout(TRANSCRIPTION_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            default_language: default_language.into(),
        })
    }

    /// Transcribe an audio file into caption cues.
    ///
    /// `language` overrides the configured default; segments come back with
    /// absolute timestamps, re-numbered 1-based, empty ones dropped.
    pub async fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> WorkerResult<Vec<SubtitleCue>> {
        let url = format!("{}/audio/transcriptions", self.api_url);
        let language = language.unwrap_or(&self.default_language);

        debug!("Uploading {} to {}", audio_path.display(), url);

        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("audio/mpeg")
                    .map_err(|e| WorkerError::transcription_failed(e.to_string()))?,
            )
            .text("model", MODEL)
            .text("response_format", "verbose_json")
            .text("language", language.to_string());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WorkerError::transcription_failed(format!(
                "API returned {status}: {body}"
            )));
        }

        let transcription: VerboseTranscription = response.json().await?;
        let cues = segments_to_cues(transcription.segments);
        info!(cues = cues.len(), language, "Transcription finished");
        Ok(cues)
    }
}

/// Convert raw segments into 1-based cues, dropping empty text.
fn segments_to_cues(segments: Vec<TranscriptionSegment>) -> Vec<SubtitleCue> {
    segments
        .into_iter()
        .filter_map(|s| {
            let text = s.text.trim().to_string();
            (!text.is_empty()).then_some((s.start, s.end, text))
        })
        .enumerate()
        .map(|(i, (start, end, text))| SubtitleCue {
            id: (i + 1) as u32,
            start,
            end,
            text,
        })
        .collect()
}
