#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the media jobs.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with stderr capture and timeouts
//! - Source retrieval, probing, and job-scoped scratch directories
//! - The four job primitives: audio extraction for transcription,
//!   sprite-sheet filmstrips, preview frames, and the final subtitle
//!   burn-in render

pub mod audio;
pub mod command;
pub mod download;
pub mod error;
pub mod filmstrip;
pub mod probe;
pub mod publish;
pub mod render;
pub mod subtitles;
pub mod thumbnail;
pub mod workspace;

pub use audio::extract_audio;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use download::fetch_source;
pub use error::{MediaError, MediaResult};
pub use filmstrip::generate_sprite;
pub use probe::{count_frames, get_duration, probe_video, VideoInfo};
pub use publish::{publish_render, publish_thumbnail, rendered_file_name, thumbnail_dir};
pub use render::{build_render_command, render_video, RenderOptions};
pub use subtitles::{
    ass_color, build_force_style, format_srt_timestamp, subtitles_filter, write_srt,
};
pub use thumbnail::{extract_frame, extract_frames, frame_file_name, SeekMode};
pub use workspace::JobWorkspace;
