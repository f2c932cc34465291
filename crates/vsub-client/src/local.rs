//! FFmpeg-backed local frame extraction for the canvas track.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

use vsub_media::{extract_frame, SeekMode};

use crate::error::ClientResult;
use crate::filmstrip::{FrameSource, LocalFrame};

/// Extracts canvas frames with fast keyframe seeks. Speed matters more than
/// frame accuracy here — these frames are on screen for a few seconds before
/// the sprite sheet replaces them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaFrameSource;

#[async_trait]
impl FrameSource for MediaFrameSource {
    async fn extract(
        &self,
        source: &Path,
        timestamps: &[f64],
        output_dir: &Path,
    ) -> ClientResult<Vec<LocalFrame>> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(vsub_media::MediaError::from)?;

        let mut frames = Vec::with_capacity(timestamps.len());
        for (i, &timestamp) in timestamps.iter().enumerate() {
            let path = output_dir.join(format!("canvas_{:03}.jpg", i + 1));
            match extract_frame(source, &path, timestamp, SeekMode::Fast).await {
                Ok(()) if path.exists() => frames.push(LocalFrame { timestamp, path }),
                Ok(()) => warn!("Canvas frame at {:.1}s was not written", timestamp),
                Err(e) => warn!("Canvas frame at {:.1}s failed: {}", timestamp, e),
            }
        }

        if frames.is_empty() {
            return Err(vsub_media::MediaError::NoFramesExtracted.into());
        }
        Ok(frames)
    }
}
