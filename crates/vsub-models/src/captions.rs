//! Caption track models.
//!
//! Two shapes exist for one cue: [`CaptionCue`] is the persisted project
//! shape (`startSeconds`/`endSeconds`), [`SubtitleCue`] is the shape the
//! worker speaks (`start`/`end`, matching the transcription engine's
//! segment output). Conversions are lossless in both directions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single caption entry as stored on a video project.
///
/// Cues are non-overlapping by convention only; nothing enforces it. The
/// whole track is always replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionCue {
    /// 1-based sequence number
    pub id: u32,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

/// A cue on the worker wire: transcription webhook output and render job
/// input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubtitleCue {
    /// 1-based sequence number
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl From<SubtitleCue> for CaptionCue {
    fn from(cue: SubtitleCue) -> Self {
        Self {
            id: cue.id,
            start_seconds: cue.start,
            end_seconds: cue.end,
            text: cue.text,
        }
    }
}

impl From<CaptionCue> for SubtitleCue {
    fn from(cue: CaptionCue) -> Self {
        Self {
            id: cue.id,
            start: cue.start_seconds,
            end: cue.end_seconds,
            text: cue.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_wire_names() {
        let cue = CaptionCue {
            id: 1,
            start_seconds: 0.0,
            end_seconds: 3.5,
            text: "Hi".into(),
        };
        let json = serde_json::to_value(&cue).unwrap();
        assert_eq!(json["startSeconds"], 0.0);
        assert_eq!(json["endSeconds"], 3.5);

        let wire: SubtitleCue = serde_json::from_value(serde_json::json!({
            "id": 1, "start": 0.0, "end": 3.5, "text": "Hi"
        }))
        .unwrap();
        assert_eq!(CaptionCue::from(wire), cue);
    }

    #[test]
    fn test_cue_round_trip() {
        let cue = CaptionCue {
            id: 7,
            start_seconds: 12.25,
            end_seconds: 15.0,
            text: "hello world".into(),
        };
        let back = CaptionCue::from(SubtitleCue::from(cue.clone()));
        assert_eq!(back, cue);
    }
}
