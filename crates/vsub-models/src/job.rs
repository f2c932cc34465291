//! Worker job requests and the dispatch wire format.
//!
//! Each job type has its own strongly typed body; [`JobRequest`] is the
//! tagged union the orchestrator hands to its dispatch client, which picks
//! the worker route from the variant. The job id on the wire is the video
//! id — one in-flight job per type per video is the invariant, so no
//! separate job identity exists.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::captions::SubtitleCue;
use crate::render::{LogoOverlay, RenderFormat, TrimRange};
use crate::style::CaptionStyle;
use crate::video::VideoId;

/// The four job types the worker executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Transcription,
    Render,
    Filmstrip,
    Thumbnails,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Transcription => "transcription",
            JobKind::Render => "render",
            JobKind::Filmstrip => "filmstrip",
            JobKind::Thumbnails => "thumbnails",
        }
    }

    /// Path of the worker endpoint accepting this job type.
    pub fn worker_path(&self) -> &'static str {
        match self {
            JobKind::Transcription => "/transcribe",
            JobKind::Render => "/render",
            JobKind::Filmstrip => "/generate-filmstrip",
            JobKind::Thumbnails => "/generate-thumbnails",
        }
    }

    /// Suffix of the orchestrator webhook route this job reports back to.
    pub fn webhook_suffix(&self) -> &'static str {
        match self {
            JobKind::Transcription => "transcription",
            JobKind::Render => "render",
            JobKind::Filmstrip => "filmstrip",
            JobKind::Thumbnails => "thumbnails",
        }
    }

    /// Whether dispatching this job type drives the primary status machine.
    /// Filmstrip and thumbnails are side channels and never touch status.
    pub fn affects_status(&self) -> bool {
        matches!(self, JobKind::Transcription | JobKind::Render)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of `POST /transcribe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeJob {
    pub video_id: VideoId,
    pub video_url: String,
    /// ISO-639-1 hint for the speech model; absent lets the worker default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub webhook_url: String,
}

/// Body of `POST /render`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    pub video_id: VideoId,
    pub video_url: String,
    /// Cues to burn in, in wire shape
    pub subtitles: Vec<SubtitleCue>,
    #[serde(default)]
    pub style: CaptionStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<RenderFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<TrimRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoOverlay>,
    pub webhook_url: String,
}

/// Body of `POST /generate-filmstrip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilmstripJob {
    pub video_id: VideoId,
    pub video_url: String,
    pub duration_seconds: f64,
    pub webhook_url: String,
}

/// Body of `POST /generate-thumbnails`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailsJob {
    pub video_id: VideoId,
    pub video_url: String,
    pub duration_seconds: f64,
    pub webhook_url: String,
}

/// A dispatchable job, tagged by type. The wire carries no tag — the
/// worker route implies the type — so the union itself is not serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum JobRequest {
    Transcription(TranscribeJob),
    Render(RenderJob),
    Filmstrip(FilmstripJob),
    Thumbnails(ThumbnailsJob),
}

impl JobRequest {
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Transcription(_) => JobKind::Transcription,
            JobRequest::Render(_) => JobKind::Render,
            JobRequest::Filmstrip(_) => JobKind::Filmstrip,
            JobRequest::Thumbnails(_) => JobKind::Thumbnails,
        }
    }

    pub fn video_id(&self) -> &VideoId {
        match self {
            JobRequest::Transcription(job) => &job.video_id,
            JobRequest::Render(job) => &job.video_id,
            JobRequest::Filmstrip(job) => &job.video_id,
            JobRequest::Thumbnails(job) => &job.video_id,
        }
    }

    /// Serialize the variant body for the dispatch POST.
    pub fn to_body(&self) -> serde_json::Value {
        match self {
            JobRequest::Transcription(job) => serde_json::json!(job),
            JobRequest::Render(job) => serde_json::json!(job),
            JobRequest::Filmstrip(job) => serde_json::json!(job),
            JobRequest::Thumbnails(job) => serde_json::json!(job),
        }
    }
}

/// Worker acknowledgement for an accepted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchAck {
    /// Always `"processing"` for an accepted job
    pub status: String,
    pub video_id: VideoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DispatchAck {
    pub fn processing(video_id: VideoId, message: impl Into<String>) -> Self {
        Self {
            status: "processing".to_string(),
            video_id,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_paths() {
        assert_eq!(JobKind::Transcription.worker_path(), "/transcribe");
        assert_eq!(JobKind::Render.worker_path(), "/render");
        assert_eq!(JobKind::Filmstrip.worker_path(), "/generate-filmstrip");
        assert_eq!(JobKind::Thumbnails.worker_path(), "/generate-thumbnails");
    }

    #[test]
    fn test_side_channels_do_not_affect_status() {
        assert!(JobKind::Transcription.affects_status());
        assert!(JobKind::Render.affects_status());
        assert!(!JobKind::Filmstrip.affects_status());
        assert!(!JobKind::Thumbnails.affects_status());
    }

    #[test]
    fn test_dispatch_body_is_camel_case() {
        let job = JobRequest::Filmstrip(FilmstripJob {
            video_id: VideoId::from("v1"),
            video_url: "/uploads/v1.mp4".into(),
            duration_seconds: 20.0,
            webhook_url: "http://localhost:3000/api/webhooks/filmstrip".into(),
        });
        let body = job.to_body();
        assert_eq!(body["videoId"], "v1");
        assert_eq!(body["videoUrl"], "/uploads/v1.mp4");
        assert_eq!(body["durationSeconds"], 20.0);
        assert_eq!(
            body["webhookUrl"],
            "http://localhost:3000/api/webhooks/filmstrip"
        );
        assert_eq!(job.kind(), JobKind::Filmstrip);
        assert_eq!(job.video_id().as_str(), "v1");
    }

    #[test]
    fn test_render_job_optional_fields_stay_off_wire() {
        let job = RenderJob {
            video_id: VideoId::from("v1"),
            video_url: "/uploads/v1.mp4".into(),
            subtitles: vec![],
            style: CaptionStyle::default(),
            format: None,
            trim: None,
            logo: None,
            webhook_url: "http://localhost:3000/api/webhooks/render".into(),
        };
        let body = serde_json::to_value(&job).unwrap();
        assert!(body.get("format").is_none());
        assert!(body.get("trim").is_none());
        assert!(body.get("logo").is_none());
    }

    #[test]
    fn test_dispatch_ack_shape() {
        let ack = DispatchAck::processing(VideoId::from("v1"), "Render started");
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["status"], "processing");
        assert_eq!(json["videoId"], "v1");
        assert_eq!(json["message"], "Render started");
    }
}
