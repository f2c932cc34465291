//! Job dispatch endpoints.
//!
//! Each handler is "validate, transition, dispatch, return" — nothing here
//! waits on media work. A dispatch failure for transcription or render flips
//! the record to `failed` in the same request, because no webhook will ever
//! arrive for a job the worker did not accept.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use vsub_models::{
    DispatchAck, FilmstripJob, JobKind, JobRequest, LogoOverlay, RenderFormat, RenderJob,
    StatusEvent, ThumbnailsJob, TranscribeJob, TrimRange, VideoId, VideoProject,
};

use crate::error::{ApiError, ApiResult};
use crate::handlers::videos::FilmstripResponse;
use crate::state::AppState;

/// Dispatch a gated job: apply the in-progress transition first, then hand
/// the job to the worker. The transition is what blocks duplicate dispatch.
async fn dispatch_gated(
    state: &AppState,
    id: &VideoId,
    event: StatusEvent,
    job: JobRequest,
) -> ApiResult<DispatchAck> {
    state
        .store
        .update(id, |p| p.apply(event))
        .await
        .ok_or_else(|| ApiError::not_found(format!("video {id}")))??;

    match state.worker.dispatch(&job).await {
        Ok(ack) => {
            info!(video_id = %id, job_type = %job.kind(), "Job dispatched");
            Ok(ack)
        }
        Err(e) => {
            error!(video_id = %id, job_type = %job.kind(), "Dispatch failed: {}", e);
            // No webhook is coming; fail the record now. Worker-report
            // events always transition, so the inner result is infallible.
            state
                .store
                .update(id, |p| p.apply(StatusEvent::DispatchFailed).ok())
                .await;
            Err(e.into())
        }
    }
}

fn load_project(project: Option<VideoProject>, id: &VideoId) -> ApiResult<VideoProject> {
    project.ok_or_else(|| ApiError::not_found(format!("video {id}")))
}

/// Body of `POST /api/videos/:id/transcribe`.
#[derive(Debug, Default, Deserialize)]
pub struct TranscribeRequest {
    /// ISO-639-1 override for the speech model
    #[serde(default)]
    pub language: Option<String>,
}

/// Start a transcription job.
pub async fn start_transcription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<TranscribeRequest>>,
) -> ApiResult<(StatusCode, Json<DispatchAck>)> {
    let id = VideoId::from(id);
    let project = load_project(state.store.get(&id).await, &id)?;
    let Json(request) = body.unwrap_or_default();

    let job = JobRequest::Transcription(TranscribeJob {
        video_id: id.clone(),
        video_url: project.source_url,
        language: request.language,
        webhook_url: state.worker.webhook_url(JobKind::Transcription),
    });

    let ack = dispatch_gated(&state, &id, StatusEvent::TranscribeRequested, job).await?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// Body of `POST /api/videos/:id/render`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub format: Option<RenderFormat>,
    #[serde(default)]
    pub trim: Option<TrimRange>,
    #[serde(default)]
    pub logo: Option<LogoOverlay>,
}

/// Start a render job burning the current caption track and style.
pub async fn start_render(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RenderRequest>>,
) -> ApiResult<(StatusCode, Json<DispatchAck>)> {
    let id = VideoId::from(id);
    let project = load_project(state.store.get(&id).await, &id)?;
    let Json(request) = body.unwrap_or_default();

    if let Some(trim) = &request.trim {
        if !trim.is_valid() {
            return Err(ApiError::bad_request("invalid trim range"));
        }
    }

    let job = JobRequest::Render(RenderJob {
        video_id: id.clone(),
        video_url: project.source_url,
        subtitles: project.caption_track.into_iter().map(Into::into).collect(),
        style: project.caption_style,
        format: request.format,
        trim: request.trim.filter(|t| !t.is_empty()),
        logo: request.logo,
        webhook_url: state.worker.webhook_url(JobKind::Render),
    });

    let ack = dispatch_gated(&state, &id, StatusEvent::RenderRequested, job).await?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// Filmstrip dispatch outcome: either the cached record or an accepted job.
#[derive(Debug)]
pub enum FilmstripDispatch {
    Cached(FilmstripResponse),
    Accepted(DispatchAck),
}

impl axum::response::IntoResponse for FilmstripDispatch {
    fn into_response(self) -> axum::response::Response {
        match self {
            FilmstripDispatch::Cached(body) => (StatusCode::OK, Json(body)).into_response(),
            FilmstripDispatch::Accepted(ack) => (StatusCode::ACCEPTED, Json(ack)).into_response(),
        }
    }
}

/// Request filmstrip generation.
///
/// Cache check first: a filmstrip is immutable once present, so an existing
/// record short-circuits without touching the worker. Filmstrip is a side
/// channel — no status transition either way.
pub async fn generate_filmstrip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<FilmstripDispatch> {
    let id = VideoId::from(id);
    let project = load_project(state.store.get(&id).await, &id)?;

    if let Some(filmstrip) = project.filmstrip {
        info!(video_id = %id, "Filmstrip already exists, skipping dispatch");
        return Ok(FilmstripDispatch::Cached(FilmstripResponse { filmstrip }));
    }

    let job = JobRequest::Filmstrip(FilmstripJob {
        video_id: id.clone(),
        video_url: project.source_url,
        duration_seconds: project.duration_seconds,
        webhook_url: state.worker.webhook_url(JobKind::Filmstrip),
    });

    let ack = state.worker.dispatch(&job).await?;
    info!(video_id = %id, "Filmstrip job dispatched");
    Ok(FilmstripDispatch::Accepted(ack))
}

/// Request thumbnail generation. Side channel, no cache guard: thumbnails
/// may be regenerated on demand.
pub async fn generate_thumbnails(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<DispatchAck>)> {
    let id = VideoId::from(id);
    let project = load_project(state.store.get(&id).await, &id)?;

    let job = JobRequest::Thumbnails(ThumbnailsJob {
        video_id: id.clone(),
        video_url: project.source_url,
        duration_seconds: project.duration_seconds,
        webhook_url: state.worker.webhook_url(JobKind::Thumbnails),
    });

    let ack = state.worker.dispatch(&job).await?;
    info!(video_id = %id, "Thumbnails job dispatched");
    Ok((StatusCode::ACCEPTED, Json(ack)))
}
