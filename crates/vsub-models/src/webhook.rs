//! Webhook payloads the worker posts back to the orchestrator.
//!
//! One payload type per job type, each delivered to its own callback
//! route. Failure payloads carry only the error string; the orchestrator
//! logs it and flips status without persisting the detail.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::captions::SubtitleCue;
use crate::filmstrip::{FilmstripMetadata, Thumbnail};
use crate::video::VideoId;

/// Outcome reported by a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WebhookStatus {
    Completed,
    Failed,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Completed => "completed",
            WebhookStatus::Failed => "failed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WebhookStatus::Completed)
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `POST {webhookUrl}` for a transcription job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionWebhook {
    pub video_id: VideoId,
    pub status: WebhookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<Vec<SubtitleCue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranscriptionWebhook {
    pub fn completed(video_id: VideoId, subtitles: Vec<SubtitleCue>) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Completed,
            subtitles: Some(subtitles),
            error: None,
        }
    }

    pub fn failed(video_id: VideoId, error: impl Into<String>) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Failed,
            subtitles: None,
            error: Some(error.into()),
        }
    }
}

/// `POST {webhookUrl}` for a render job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderWebhook {
    pub video_id: VideoId,
    pub status: WebhookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    /// Artifact path inside the worker; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderWebhook {
    pub fn completed(
        video_id: VideoId,
        output_url: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Completed,
            output_url: Some(output_url.into()),
            output_path: Some(output_path.into()),
            error: None,
        }
    }

    pub fn failed(video_id: VideoId, error: impl Into<String>) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Failed,
            output_url: None,
            output_path: None,
            error: Some(error.into()),
        }
    }
}

/// `POST {webhookUrl}` for a filmstrip job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilmstripWebhook {
    pub video_id: VideoId,
    pub status: WebhookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filmstrip_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FilmstripMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FilmstripWebhook {
    pub fn completed(
        video_id: VideoId,
        filmstrip_url: impl Into<String>,
        metadata: FilmstripMetadata,
    ) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Completed,
            filmstrip_url: Some(filmstrip_url.into()),
            metadata: Some(metadata),
            error: None,
        }
    }

    pub fn failed(video_id: VideoId, error: impl Into<String>) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Failed,
            filmstrip_url: None,
            metadata: None,
            error: Some(error.into()),
        }
    }
}

/// `POST {webhookUrl}` for a thumbnails job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailsWebhook {
    pub video_id: VideoId,
    pub status: WebhookStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<Thumbnail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ThumbnailsWebhook {
    pub fn completed(video_id: VideoId, thumbnails: Vec<Thumbnail>) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Completed,
            thumbnails: Some(thumbnails),
            error: None,
        }
    }

    pub fn failed(video_id: VideoId, error: impl Into<String>) -> Self {
        Self {
            video_id,
            status: WebhookStatus::Failed,
            thumbnails: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcription_webhook_wire_shape() {
        let payload: TranscriptionWebhook = serde_json::from_value(serde_json::json!({
            "videoId": "v1",
            "subtitles": [{"id": 1, "start": 0.0, "end": 3.5, "text": "Hi"}],
            "status": "completed"
        }))
        .unwrap();
        assert!(payload.status.is_completed());
        let cues = payload.subtitles.unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Hi");
    }

    #[test]
    fn test_failure_webhook_carries_only_error() {
        let payload = RenderWebhook::failed(VideoId::from("v1"), "FFmpeg error: boom");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "FFmpeg error: boom");
        assert!(json.get("outputUrl").is_none());
        assert!(json.get("outputPath").is_none());
    }

    #[test]
    fn test_filmstrip_webhook_metadata_keys() {
        let payload = FilmstripWebhook::completed(
            VideoId::from("v1"),
            "/uploads/thumbnails/v1/filmstrip.jpg",
            FilmstripMetadata {
                frame_count: 15,
                frame_width: 160,
                frame_height: 90,
                total_width: 2400,
                file_size: 118_324,
            },
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["filmstripUrl"], "/uploads/thumbnails/v1/filmstrip.jpg");
        assert_eq!(json["metadata"]["frameCount"], 15);
        assert_eq!(json["metadata"]["totalWidth"], 2400);
        assert_eq!(json["metadata"]["fileSize"], 118_324);
    }

    #[test]
    fn test_thumbnails_webhook_entries() {
        let payload = ThumbnailsWebhook::completed(
            VideoId::from("v1"),
            vec![Thumbnail { timestamp: 0.0, url: "/uploads/thumbnails/v1/frame_0.0.jpg".into() }],
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["thumbnails"][0]["timestamp"], 0.0);
        assert_eq!(json["thumbnails"][0]["url"], "/uploads/thumbnails/v1/frame_0.0.jpg");
    }
}
