//! Video lifecycle status and the transition table that governs it.
//!
//! Every status change in the system goes through [`transition`], whether it
//! originates from a synchronous API action, a worker webhook, or a failed
//! dispatch call. Keeping the table in one function makes the full lifecycle
//! auditable in one place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Processing status of a video project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    /// Source media is still being uploaded
    #[default]
    Uploading,
    /// A transcription job is in flight
    Transcribing,
    /// Captions (if any) are available; editing and rendering are possible
    Ready,
    /// A render job is in flight
    Rendering,
    /// A rendered output exists
    Completed,
    /// The last job failed; waiting for a user-initiated retry
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Uploading => "uploading",
            VideoStatus::Transcribing => "transcribing",
            VideoStatus::Ready => "ready",
            VideoStatus::Rendering => "rendering",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }

    /// True while a worker job is in flight for this video.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, VideoStatus::Transcribing | VideoStatus::Rendering)
    }

    /// True when no further status change is expected without a new user
    /// action. This is the condition pollers stop on.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VideoStatus::Ready | VideoStatus::Completed | VideoStatus::Failed
        )
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything that can move a video from one status to another.
///
/// User-action events (`TranscribeRequested`, `RenderRequested`,
/// `UploadFinished`) are gated: applying them from the wrong status is an
/// error the API maps to a conflict. Worker-report events (`*Succeeded`,
/// `*Failed`, `DispatchFailed`) apply from any status, last write wins, so
/// late or duplicate webhooks are absorbed instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Upload finished without transcription being requested
    UploadFinished,
    /// User asked for a transcription job
    TranscribeRequested,
    /// User asked for a render job
    RenderRequested,
    /// Transcription webhook reported success
    TranscriptionSucceeded,
    /// Render webhook reported success
    RenderSucceeded,
    /// A webhook reported job failure
    JobFailed,
    /// The dispatch HTTP call itself failed; no webhook will ever arrive
    DispatchFailed,
}

impl StatusEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusEvent::UploadFinished => "upload_finished",
            StatusEvent::TranscribeRequested => "transcribe_requested",
            StatusEvent::RenderRequested => "render_requested",
            StatusEvent::TranscriptionSucceeded => "transcription_succeeded",
            StatusEvent::RenderSucceeded => "render_succeeded",
            StatusEvent::JobFailed => "job_failed",
            StatusEvent::DispatchFailed => "dispatch_failed",
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user action was applied from a status that does not allow it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot apply {event} while status is {from}")]
pub struct InvalidTransition {
    pub from: VideoStatus,
    pub event: StatusEvent,
}

/// The single transition function for the video lifecycle.
///
/// `uploading → ready` (trivial path) or `uploading → transcribing →
/// {ready|failed}`; `ready → rendering → {completed|failed}`;
/// `completed → rendering` re-renders; `failed` is sticky until the user
/// retries the failed operation. Nothing here expires an in-progress state:
/// a worker that never reports back leaves the record where it was.
pub fn transition(from: VideoStatus, event: StatusEvent) -> Result<VideoStatus, InvalidTransition> {
    use StatusEvent::*;
    use VideoStatus::*;

    match event {
        UploadFinished => match from {
            Uploading => Ok(Ready),
            _ => Err(InvalidTransition { from, event }),
        },
        TranscribeRequested => match from {
            Uploading | Ready | Completed | Failed => Ok(Transcribing),
            Transcribing | Rendering => Err(InvalidTransition { from, event }),
        },
        RenderRequested => match from {
            Ready | Completed | Failed => Ok(Rendering),
            Uploading | Transcribing | Rendering => Err(InvalidTransition { from, event }),
        },
        // Worker reports are never rejected; see the type-level docs.
        TranscriptionSucceeded => Ok(Ready),
        RenderSucceeded => Ok(Completed),
        JobFailed | DispatchFailed => Ok(Failed),
    }
}
