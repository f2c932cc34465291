//! Filmstrip sprite-sheet generation.

use std::path::Path;
use tracing::info;

use vsub_models::{FilmstripMetadata, FRAME_HEIGHT_PX, FRAME_WIDTH_PX};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::count_frames;

/// Hard ceiling on sprite generation time.
const SPRITE_TIMEOUT_SECS: u64 = 120;

/// Render a horizontal sprite sheet with `frame_count` evenly spaced frames.
///
/// One of every `total / frame_count` source frames is selected, scaled to
/// the shared tile size, and tiled into a single row.
pub async fn generate_sprite(
    video_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    frame_count: u32,
) -> MediaResult<FilmstripMetadata> {
    let video_path = video_path.as_ref();
    let output_path = output_path.as_ref();

    let total_frames = count_frames(video_path).await?;
    let interval = (total_frames / u64::from(frame_count.max(1))).max(1);
    info!(
        "Sprite sheet: {} tiles, 1 of every {} source frames",
        frame_count, interval
    );

    let cmd = FfmpegCommand::new(video_path, output_path)
        .video_filter(sprite_filter(interval, frame_count))
        .single_frame()
        .quality(2);

    FfmpegRunner::new()
        .with_timeout(SPRITE_TIMEOUT_SECS)
        .run(&cmd)
        .await?;

    if !output_path.exists() {
        return Err(MediaError::internal(format!(
            "sprite sheet not created: {}",
            output_path.display()
        )));
    }

    let file_size = tokio::fs::metadata(output_path).await?.len();

    Ok(FilmstripMetadata {
        frame_count,
        frame_width: FRAME_WIDTH_PX,
        frame_height: FRAME_HEIGHT_PX,
        total_width: frame_count * FRAME_WIDTH_PX,
        file_size,
    })
}

/// Select-scale-tile filter for a single-row sprite sheet.
fn sprite_filter(interval: u64, frame_count: u32) -> String {
    format!(
        "select='not(mod(n\\,{interval}))',scale={FRAME_WIDTH_PX}:{FRAME_HEIGHT_PX}:flags=bicubic,tile={frame_count}x1"
    )
}
