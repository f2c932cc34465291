//! Audio extraction for transcription.

use std::path::{Path, PathBuf};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract the audio track as 16 kHz mono MP3, sized for speech-to-text
/// upload. The output lands next to the input with an `.mp3` extension.
pub async fn extract_audio(video_path: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let video_path = video_path.as_ref();
    let audio_path = video_path.with_extension("mp3");

    let cmd = FfmpegCommand::new(video_path, &audio_path)
        .no_video()
        .audio_rate(16_000)
        .audio_channels(1)
        .audio_bitrate("64k")
        .container_format("mp3");

    FfmpegRunner::new().run(&cmd).await?;

    Ok(audio_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_extraction_args() {
        let cmd = FfmpegCommand::new("in.mp4", "in.mp3")
            .no_video()
            .audio_rate(16_000)
            .audio_channels(1)
            .audio_bitrate("64k")
            .container_format("mp3");

        let args = cmd.build_args();
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"16000".to_string()));
        assert!(args.contains(&"-ac".to_string()));
        assert!(args.contains(&"64k".to_string()));
        assert!(args.contains(&"mp3".to_string()));
    }
}
