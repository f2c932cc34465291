//! Shared data models for the VSub pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Video projects and the lifecycle status machine
//! - Caption tracks and declarative caption styling
//! - Filmstrip/thumbnail metadata and the adaptive frame policies
//! - Job dispatch bodies and webhook payloads (camelCase wire JSON)
//! - Render options (format presets, trim, logo overlay)

pub mod captions;
pub mod filmstrip;
pub mod job;
pub mod render;
pub mod status;
pub mod style;
pub mod video;
pub mod webhook;

// Re-export common types
pub use captions::{CaptionCue, SubtitleCue};
pub use filmstrip::{
    frame_count_for_duration, frame_timestamps, thumbnail_count_for_duration, Filmstrip,
    FilmstripDisplay, FilmstripMetadata, Thumbnail, FRAME_HEIGHT_PX, FRAME_WIDTH_PX,
    MAX_THUMBNAILS,
};
pub use job::{
    DispatchAck, FilmstripJob, JobKind, JobRequest, RenderJob, ThumbnailsJob, TranscribeJob,
};
pub use render::{LogoOverlay, LogoPosition, RenderFormat, TrimRange};
pub use status::{transition, InvalidTransition, StatusEvent, VideoStatus};
pub use style::{CaptionPosition, CaptionStyle, TextAlignment};
pub use video::{VideoId, VideoProject};
pub use webhook::{
    FilmstripWebhook, RenderWebhook, ThumbnailsWebhook, TranscriptionWebhook, WebhookStatus,
};
