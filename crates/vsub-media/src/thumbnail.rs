//! Individual preview-frame extraction.

use std::path::{Path, PathBuf};
use tracing::warn;

use vsub_models::{FRAME_HEIGHT_PX, FRAME_WIDTH_PX};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Per-frame extraction ceiling; one stuck seek must not stall the batch.
const FRAME_TIMEOUT_SECS: u64 = 30;

/// Seek accuracy for a single-frame grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    /// Input-side seek: jumps to the nearest keyframe. Fast but approximate.
    Fast,
    /// Output-side seek: decodes up to the exact frame. Slower, but
    /// neighbouring grabs stay distinct.
    Accurate,
}

/// Published file name for a frame at `timestamp` seconds.
pub fn frame_file_name(timestamp: f64) -> String {
    format!("frame_{timestamp:.1}.jpg")
}

/// Grab a single frame at `timestamp` into `output_path`.
pub async fn extract_frame(
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    timestamp: f64,
    mode: SeekMode,
) -> MediaResult<()> {
    let cmd = FfmpegCommand::new(video_path.as_ref(), output_path.as_ref());
    let cmd = match mode {
        SeekMode::Fast => cmd.seek(timestamp),
        SeekMode::Accurate => cmd.seek_output(timestamp),
    };
    let cmd = cmd
        .single_frame()
        .video_filter(format!(
            "scale={FRAME_WIDTH_PX}:{FRAME_HEIGHT_PX}:flags=bicubic"
        ))
        .quality(2);

    FfmpegRunner::new()
        .with_timeout(FRAME_TIMEOUT_SECS)
        .run(&cmd)
        .await
}

/// Extract frames at each timestamp, skipping the ones that fail.
///
/// Uses accurate seeking so adjacent thumbnails do not collapse onto the same
/// keyframe. Errors only when not a single frame could be produced.
pub async fn extract_frames(
    video_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    timestamps: &[f64],
) -> MediaResult<Vec<(f64, PathBuf)>> {
    let video_path = video_path.as_ref();
    let output_dir = output_dir.as_ref();

    let mut frames = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let frame_path = output_dir.join(format!("frame_{:03}.jpg", i + 1));
        match extract_frame(video_path, &frame_path, timestamp, SeekMode::Accurate).await {
            Ok(()) if frame_path.exists() => frames.push((timestamp, frame_path)),
            Ok(()) => warn!("Frame at {:.1}s was not written", timestamp),
            Err(e) => warn!("Frame at {:.1}s failed: {}", timestamp, e),
        }
    }

    if frames.is_empty() {
        return Err(MediaError::NoFramesExtracted);
    }

    Ok(frames)
}
