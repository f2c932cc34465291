//! Filmstrip and thumbnail metadata, plus the adaptive frame policies.
//!
//! The frame-count policy is a pure function of duration shared by the
//! client's fast local extraction and the worker's sprite generation, so
//! both tracks produce visually consistent density.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hard ceiling on individual thumbnails per video.
pub const MAX_THUMBNAILS: u32 = 30;

/// Native size of extracted preview frames, in pixels.
pub const FRAME_WIDTH_PX: u32 = 160;
pub const FRAME_HEIGHT_PX: u32 = 90;

/// A generated sprite sheet of preview frames, as stored on a project.
///
/// Immutable once set: presence is treated as a permanent cache and the
/// orchestrator never dispatches a second generation job for the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Filmstrip {
    pub uri: String,
    pub frame_count: u32,
    pub frame_width_px: u32,
    pub frame_height_px: u32,
    pub total_width_px: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
}

impl Filmstrip {
    /// Horizontal pixel range of frame `i` inside the sprite sheet:
    /// `[i*frameWidth, (i+1)*frameWidth)`.
    pub fn frame_source_range(&self, index: u32) -> Option<(u32, u32)> {
        if index >= self.frame_count {
            return None;
        }
        let start = index * self.frame_width_px;
        Some((start, start + self.frame_width_px))
    }

    /// Display geometry that fits the strip to a container: the displayed
    /// width always equals the container width, regardless of the sprite's
    /// native size.
    pub fn scaled_for(&self, container_width_px: u32) -> FilmstripDisplay {
        let scale = if self.total_width_px == 0 {
            1.0
        } else {
            container_width_px as f64 / self.total_width_px as f64
        };
        FilmstripDisplay {
            display_width_px: container_width_px,
            display_height_px: (self.frame_height_px as f64 * scale).round() as u32,
            frame_display_width_px: self.frame_width_px as f64 * scale,
        }
    }
}

/// On-screen geometry of a filmstrip scaled into a timeline container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmstripDisplay {
    pub display_width_px: u32,
    pub display_height_px: u32,
    pub frame_display_width_px: f64,
}

/// Sprite metadata as carried by the filmstrip webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilmstripMetadata {
    pub frame_count: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub total_width: u32,
    pub file_size: u64,
}

impl FilmstripMetadata {
    /// Combine wire metadata with the sprite URL into the persisted record.
    pub fn into_filmstrip(self, uri: impl Into<String>) -> Filmstrip {
        Filmstrip {
            uri: uri.into(),
            frame_count: self.frame_count,
            frame_width_px: self.frame_width,
            frame_height_px: self.frame_height,
            total_width_px: self.total_width,
            file_size_bytes: Some(self.file_size),
        }
    }
}

/// One standalone preview frame, as delivered by the thumbnails job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Thumbnail {
    /// Seconds into the video this frame was taken at
    pub timestamp: f64,
    pub url: String,
}

/// Filmstrip frame count for a video duration.
///
/// Four buckets, monotone non-decreasing: short videos get 15 frames,
/// anything over ten minutes caps at 30.
pub fn frame_count_for_duration(duration_seconds: f64) -> u32 {
    if duration_seconds <= 30.0 {
        15
    } else if duration_seconds <= 180.0 {
        20
    } else if duration_seconds <= 600.0 {
        25
    } else {
        30
    }
}

/// Evenly spaced timestamps inclusive of both endpoints:
/// frame `i` sits at `i / (count-1) * duration`.
pub fn frame_timestamps(duration_seconds: f64, count: u32) -> Vec<f64> {
    if count <= 1 {
        return vec![0.0];
    }
    (0..count)
        .map(|i| i as f64 * duration_seconds / (count - 1) as f64)
        .collect()
}

/// Standalone-thumbnail count for a video duration.
///
/// Denser than the filmstrip policy and clamped per bucket; the truncating
/// division matches the extraction engine's arithmetic.
pub fn thumbnail_count_for_duration(duration_seconds: f64) -> u32 {
    let count = if duration_seconds <= 30.0 {
        ((duration_seconds / 3.0) as u32).clamp(8, 12)
    } else if duration_seconds <= 180.0 {
        ((duration_seconds / 10.0) as u32).clamp(15, 20)
    } else if duration_seconds <= 600.0 {
        ((duration_seconds / 20.0) as u32).clamp(20, 25)
    } else {
        ((duration_seconds / 30.0) as u32).clamp(25, MAX_THUMBNAILS)
    };
    count.min(MAX_THUMBNAILS)
}
