//! Video project record and its identifier.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::captions::CaptionCue;
use crate::filmstrip::{Filmstrip, Thumbnail};
use crate::status::{transition, InvalidTransition, StatusEvent, VideoStatus};
use crate::style::CaptionStyle;

/// Unique identifier for a video project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One uploaded source video and everything derived from it.
///
/// All mutation goes through the methods here so `updated_at` stays honest
/// and status changes go through the transition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoProject {
    pub id: VideoId,

    pub title: String,

    /// URI of the original uploaded media
    pub source_url: String,

    pub duration_seconds: f64,

    #[serde(default)]
    pub status: VideoStatus,

    /// Full caption track; replaced wholesale, never patched
    #[serde(default)]
    pub caption_track: Vec<CaptionCue>,

    #[serde(default)]
    pub caption_style: CaptionStyle,

    /// Rendered output; absent until a render completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,

    /// Sprite-sheet preview strip; permanent cache once present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filmstrip: Option<Filmstrip>,

    /// Standalone preview frames; side channel like the filmstrip
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<Thumbnail>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl VideoProject {
    /// Create a fresh project in `uploading` state.
    pub fn new(title: impl Into<String>, source_url: impl Into<String>, duration_seconds: f64) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            title: title.into(),
            source_url: source_url.into(),
            duration_seconds,
            status: VideoStatus::Uploading,
            caption_track: Vec::new(),
            caption_style: CaptionStyle::default(),
            output_url: None,
            filmstrip: None,
            thumbnails: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a lifecycle event through the transition table.
    pub fn apply(&mut self, event: StatusEvent) -> Result<VideoStatus, InvalidTransition> {
        let next = transition(self.status, event)?;
        self.status = next;
        self.touch();
        Ok(next)
    }

    /// Replace the entire caption track.
    pub fn set_caption_track(&mut self, cues: Vec<CaptionCue>) {
        self.caption_track = cues;
        self.touch();
    }

    pub fn set_caption_style(&mut self, style: CaptionStyle) {
        self.caption_style = style;
        self.touch();
    }

    /// Record a finished render. Each successful render overwrites the
    /// previous output.
    pub fn set_output_url(&mut self, url: impl Into<String>) {
        self.output_url = Some(url.into());
        self.touch();
    }

    /// Store filmstrip metadata. Webhook redelivery overwrites with the
    /// same value; the cache check at dispatch time is what makes the
    /// record effectively immutable.
    pub fn set_filmstrip(&mut self, filmstrip: Filmstrip) {
        self.filmstrip = Some(filmstrip);
        self.touch();
    }

    pub fn set_thumbnails(&mut self, thumbnails: Vec<Thumbnail>) {
        self.thumbnails = thumbnails;
        self.touch();
    }

    pub fn has_filmstrip(&self) -> bool {
        self.filmstrip.is_some()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_generation() {
        let id1 = VideoId::new();
        let id2 = VideoId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_project_starts_uploading() {
        let project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        assert_eq!(project.status, VideoStatus::Uploading);
        assert!(project.caption_track.is_empty());
        assert!(project.output_url.is_none());
        assert!(!project.has_filmstrip());
    }

    #[test]
    fn test_apply_gates_invalid_events() {
        let mut project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        assert!(project.apply(StatusEvent::RenderRequested).is_err());
        assert_eq!(project.status, VideoStatus::Uploading);

        project.apply(StatusEvent::UploadFinished).unwrap();
        assert_eq!(project.status, VideoStatus::Ready);
        project.apply(StatusEvent::RenderRequested).unwrap();
        assert_eq!(project.status, VideoStatus::Rendering);
    }

    #[test]
    fn test_track_replacement_discards_previous() {
        let mut project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        project.set_caption_track(vec![
            CaptionCue { id: 1, start_seconds: 0.0, end_seconds: 1.0, text: "old".into() },
            CaptionCue { id: 2, start_seconds: 1.0, end_seconds: 2.0, text: "old2".into() },
        ]);
        project.set_caption_track(vec![CaptionCue {
            id: 1,
            start_seconds: 0.0,
            end_seconds: 3.5,
            text: "Hi".into(),
        }]);
        assert_eq!(project.caption_track.len(), 1);
        assert_eq!(project.caption_track[0].text, "Hi");
    }

    #[test]
    fn test_project_wire_shape() {
        let project = VideoProject::new("Demo", "/uploads/demo.mp4", 20.0);
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["status"], "uploading");
        assert!(json.get("sourceUrl").is_some());
        assert!(json.get("durationSeconds").is_some());
        // Absent optionals stay off the wire.
        assert!(json.get("outputUrl").is_none());
        assert!(json.get("filmstrip").is_none());
    }
}
